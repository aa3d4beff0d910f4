//! Prompt text for muscle-growth renderings.

use crate::models::{Gender, MuscleGroup};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct BodyAttributes {
    /// cm
    pub height: f64,
    /// kg
    pub weight: f64,
    pub body_fat_percentage: Option<f64>,
    pub gender: Gender,
    pub age: u32,
}

/// Development level (0-100) of each rendered muscle group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MuscleGrowth {
    pub chest: f64,
    pub back: f64,
    pub shoulders: f64,
    pub arms: f64,
    pub legs: f64,
    pub core: f64,
}

impl MuscleGrowth {
    /// Take levels from a sparse simulation map. Missing groups are 0;
    /// `FullBody` has no slot of its own and is ignored.
    pub fn from_groups(groups: &BTreeMap<MuscleGroup, f64>) -> Self {
        let level = |group: MuscleGroup| groups.get(&group).copied().unwrap_or(0.0);
        Self {
            chest: level(MuscleGroup::Chest),
            back: level(MuscleGroup::Back),
            shoulders: level(MuscleGroup::Shoulders),
            arms: level(MuscleGroup::Arms),
            legs: level(MuscleGroup::Legs),
            core: level(MuscleGroup::Core),
        }
    }

    fn labelled(&self) -> [(&'static str, f64); 6] {
        [
            ("Chest", self.chest),
            ("Back", self.back),
            ("Shoulder", self.shoulders),
            ("Arm", self.arms),
            ("Leg", self.legs),
            ("Core", self.core),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DevelopmentBand {
    Minimal,
    Noticeable,
    Moderate,
    Significant,
    Exceptional,
}

impl DevelopmentBand {
    pub fn from_level(level: f64) -> Self {
        if level < 20.0 {
            DevelopmentBand::Minimal
        } else if level < 40.0 {
            DevelopmentBand::Noticeable
        } else if level < 60.0 {
            DevelopmentBand::Moderate
        } else if level < 80.0 {
            DevelopmentBand::Significant
        } else {
            DevelopmentBand::Exceptional
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DevelopmentBand::Minimal => "minimal development, just starting to tone",
            DevelopmentBand::Noticeable => "noticeable tone, beginning development",
            DevelopmentBand::Moderate => "moderate development, clear muscle definition",
            DevelopmentBand::Significant => "significant development, well-defined muscles",
            DevelopmentBand::Exceptional => {
                "exceptional development, highly defined and prominent muscles"
            }
        }
    }
}

const IMAGE_SPECIFICATIONS: &[&str] = &[
    "Ultra-realistic 3D render",
    "Neutral standing pose, showing full body",
    "Soft studio lighting",
    "Clean background",
    "Athletic wear: fitted shorts and tank top showing muscle definition",
];

/// Build the rendering prompt. Pure: the same inputs always give the same text.
///
/// An empty baseline URL counts as no baseline.
pub fn build_prompt(
    body: &BodyAttributes,
    growth: &MuscleGrowth,
    baseline_image_url: Option<&str>,
) -> String {
    let subject = match body.gender {
        Gender::Male => "male",
        Gender::Female | Gender::Other => "female",
    };

    let mut lines = vec![
        format!(
            "Generate a realistic 3D rendered image of a {subject} fitness model with the following attributes:"
        ),
        format!("- Height: {}cm", body.height),
        format!("- Weight: {}kg", body.weight),
        format!("- Age: {} years old", body.age),
    ];
    if let Some(body_fat) = body.body_fat_percentage.filter(|bf| *bf != 0.0) {
        lines.push(format!("- Body fat percentage: {body_fat}%"));
    }

    lines.push(String::new());
    lines.push("Muscle development levels:".to_string());
    lines.extend(
        growth
            .labelled()
            .into_iter()
            .filter(|(_, level)| *level > 0.0)
            .map(|(label, level)| {
                let band = DevelopmentBand::from_level(level);
                format!("- {label} muscles: {}", band.description())
            }),
    );

    lines.push(String::new());
    lines.push("Image specifications:".to_string());
    lines.extend(IMAGE_SPECIFICATIONS.iter().map(|spec| format!("- {spec}")));

    if let Some(url) = baseline_image_url.filter(|url| !url.is_empty()) {
        lines.push(String::new());
        lines.push(format!(
            "Use this baseline image as reference for facial features and overall body structure: {url}"
        ));
    }
    lines.join("\n")
}
