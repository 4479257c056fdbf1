use std::sync::OnceLock;

use serde::Serialize;

use crate::models::Framework;

/// One of the two options a dilemma presents, pre-tagged with the framework
/// choosing it instantiates.
#[derive(Debug, Clone, Serialize)]
pub struct DilemmaChoice {
    pub title: &'static str,
    pub description: &'static str,
    pub framework: Framework,
}

/// A scenario shown to participants. The left choice is always the
/// utilitarian option and the right choice the deontological one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dilemma {
    pub id: i64,
    pub title: &'static str,
    pub description: &'static str,
    pub left_choice: DilemmaChoice,
    pub right_choice: DilemmaChoice,
}

fn dilemma(
    id: i64,
    title: &'static str,
    description: &'static str,
    left: (&'static str, &'static str),
    right: (&'static str, &'static str),
) -> Dilemma {
    Dilemma {
        id,
        title,
        description,
        left_choice: DilemmaChoice {
            title: left.0,
            description: left.1,
            framework: Framework::Utilitarian,
        },
        right_choice: DilemmaChoice {
            title: right.0,
            description: right.1,
            framework: Framework::Deontological,
        },
    }
}

/// The fixed experiment catalogue, built once. Every stored response must
/// reference one of these ids.
pub fn all() -> &'static [Dilemma] {
    static CATALOGUE: OnceLock<Vec<Dilemma>> = OnceLock::new();
    CATALOGUE.get_or_init(build_catalogue)
}

fn build_catalogue() -> Vec<Dilemma> {
    vec![
        dilemma(
            1,
            "Autonomous Vehicle Decision",
            "An autonomous vehicle detects an unavoidable accident. It must decide between:",
            (
                "Swerve to minimize casualties",
                "Swerve into one pedestrian to avoid hitting five others.",
            ),
            (
                "Maintain course",
                "Continue straight ahead, following traffic rules, even though five pedestrians will be hit.",
            ),
        ),
        dilemma(
            2,
            "AI Healthcare Resource Allocation",
            "An AI system must allocate a limited medical resource. It can choose between:",
            (
                "Maximize survival chance",
                "Give the resource to a younger patient with higher recovery probability.",
            ),
            (
                "First come, first served",
                "Give the resource to the patient who arrived first, regardless of recovery chances.",
            ),
        ),
        dilemma(
            3,
            "AI Companion Privacy",
            "An AI companion detects signs of depression in its user. Should it:",
            (
                "Alert family members",
                "Notify family members without user consent to prevent potential self-harm.",
            ),
            (
                "Respect privacy",
                "Maintain user confidentiality and only suggest professional help to the user.",
            ),
        ),
        dilemma(
            4,
            "Automated Content Moderation",
            "An AI content filter must decide on potentially harmful content that also has educational value:",
            (
                "Allow with warning",
                "Allow the content with warnings, considering its educational benefits.",
            ),
            (
                "Remove content",
                "Remove the content following platform guidelines against harmful material.",
            ),
        ),
        dilemma(
            5,
            "Predictive Policing",
            "An AI system predicts high crime likelihood in certain areas. Police resources should be:",
            (
                "Data-driven allocation",
                "Concentrate resources in predicted high-crime areas to maximize crime prevention.",
            ),
            (
                "Equal distribution",
                "Distribute resources equally across all areas to avoid potential discrimination.",
            ),
        ),
        dilemma(
            6,
            "AI Job Automation",
            "A company is implementing AI that will automate jobs. Should they:",
            (
                "Rapid implementation",
                "Implement AI quickly to maximize efficiency, even though many employees will lose jobs.",
            ),
            (
                "Gradual transition",
                "Implement slowly with retraining programs, despite delayed economic benefits.",
            ),
        ),
        dilemma(
            7,
            "Facial Recognition in Public Spaces",
            "A city is considering facial recognition technology in public areas. Should they:",
            (
                "Deploy widely",
                "Implement broadly to maximize crime prevention and public safety.",
            ),
            (
                "Limit deployment",
                "Restrict use to protect privacy rights, even if it means less effective crime prevention.",
            ),
        ),
        dilemma(
            8,
            "AI-Generated Art Copyright",
            "An AI creates art by learning from human artists. Should the AI-generated art be:",
            (
                "Freely available",
                "Made freely available to maximize creative output and cultural benefit.",
            ),
            (
                "Restricted use",
                "Limited in use out of respect for the original artists' work and rights.",
            ),
        ),
        dilemma(
            9,
            "Algorithmic Sentencing",
            "A court is using AI to recommend criminal sentences. Should the algorithm:",
            (
                "Focus on rehabilitation",
                "Prioritize rehabilitation potential and societal reintegration in its recommendations.",
            ),
            (
                "Focus on consistency",
                "Prioritize consistent punishment based on the crime committed, regardless of rehabilitation potential.",
            ),
        ),
        dilemma(
            10,
            "AI Research Ethics",
            "Scientists are developing advanced AI that could have dual-use applications. Should they:",
            (
                "Pursue research openly",
                "Continue research and publish findings openly to maximize scientific progress.",
            ),
            (
                "Restrict research",
                "Limit research or publication due to potential misuse, even if it slows scientific progress.",
            ),
        ),
    ]
}

pub fn by_id(id: i64) -> Option<&'static Dilemma> {
    all().iter().find(|d| d.id == id)
}
