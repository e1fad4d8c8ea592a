// src/completeness.rs
//! Profile completeness derivation
//!
//! A profile is scored over six fixed sections. String sections count when
//! they are non-empty after trimming, list sections when they hold at least
//! one entry. The section order is stable because the labels feed directly
//! into the profile checklist shown to candidates.

use crate::types::Profile;

/// Checklist labels, in reporting order.
pub const SECTION_LABELS: [&str; 6] = [
    "Profile Summary",
    "Skills",
    "Work Experience",
    "Education",
    "LinkedIn Profile",
    "CV/Resume",
];

fn text_present(value: Option<&str>) -> bool {
    value.map(str::trim).is_some_and(|text| !text.is_empty())
}

fn section_presence(profile: &Profile) -> [bool; 6] {
    [
        text_present(profile.summary.as_deref()),
        !profile.skills.is_empty(),
        !profile.experiences.is_empty(),
        !profile.educations.is_empty(),
        text_present(profile.linkedin_url.as_deref()),
        text_present(profile.cv_file.as_deref()),
    ]
}

/// Completeness percentage in `[0, 100]`, rounded to the nearest integer.
/// A candidate without a profile scores 0; callers keep the `None` versus
/// empty-profile distinction to choose between create and edit flows.
pub fn compute_completeness(profile: Option<&Profile>) -> u8 {
    let Some(profile) = profile else {
        return 0;
    };
    let filled = section_presence(profile)
        .iter()
        .filter(|&&present| present)
        .count();
    (filled as f64 / SECTION_LABELS.len() as f64 * 100.0).round() as u8
}

/// Labels of sections the candidate has filled in, in checklist order.
pub fn completed_sections(profile: Option<&Profile>) -> Vec<&'static str> {
    let Some(profile) = profile else {
        return Vec::new();
    };
    let presence = section_presence(profile);
    SECTION_LABELS
        .iter()
        .zip(presence)
        .filter_map(|(&label, present)| present.then_some(label))
        .collect()
}

/// Labels of sections still missing, in checklist order.
pub fn missing_sections(profile: Option<&Profile>) -> Vec<&'static str> {
    let Some(profile) = profile else {
        return SECTION_LABELS.to_vec();
    };
    let presence = section_presence(profile);
    SECTION_LABELS
        .iter()
        .zip(presence)
        .filter_map(|(&label, present)| (!present).then_some(label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Education, Experience, Skill};

    fn profile_with_sections(filled: usize) -> Profile {
        let mut profile = Profile::default();
        if filled >= 1 {
            profile.summary = Some("Experienced engineer".to_string());
        }
        if filled >= 2 {
            profile.skills = vec![Skill {
                name: "Go".to_string(),
                level: None,
            }];
        }
        if filled >= 3 {
            profile.experiences = vec![Experience {
                company: "Acme".to_string(),
                title: "Engineer".to_string(),
                years: Some(3.0),
            }];
        }
        if filled >= 4 {
            profile.educations = vec![Education {
                university: "ETH".to_string(),
                degree: "MSc".to_string(),
                year: Some(2018),
            }];
        }
        if filled >= 5 {
            profile.linkedin_url = Some("https://linkedin.com/in/someone".to_string());
        }
        if filled >= 6 {
            profile.cv_file = Some("QUJD".to_string());
        }
        profile
    }

    #[test]
    fn no_profile_scores_zero() {
        assert_eq!(compute_completeness(None), 0);
        assert_eq!(missing_sections(None).len(), 6);
        assert!(completed_sections(None).is_empty());
    }

    #[test]
    fn percentage_per_filled_section_count() {
        let expected = [0, 17, 33, 50, 67, 83, 100];
        for (filled, &percent) in expected.iter().enumerate() {
            let profile = profile_with_sections(filled);
            assert_eq!(
                compute_completeness(Some(&profile)),
                percent,
                "{} sections filled",
                filled
            );
        }
    }

    #[test]
    fn empty_profile_matches_missing_report() {
        let profile = Profile::default();
        assert_eq!(compute_completeness(Some(&profile)), 0);
        assert_eq!(missing_sections(Some(&profile)), SECTION_LABELS.to_vec());
    }

    #[test]
    fn two_sections_filled() {
        let profile = profile_with_sections(2);
        assert_eq!(compute_completeness(Some(&profile)), 33);
        assert_eq!(
            completed_sections(Some(&profile)),
            vec!["Profile Summary", "Skills"]
        );
        assert_eq!(
            missing_sections(Some(&profile)),
            vec!["Work Experience", "Education", "LinkedIn Profile", "CV/Resume"]
        );
    }

    #[test]
    fn whitespace_only_strings_count_as_missing() {
        let profile = Profile {
            summary: Some("   ".to_string()),
            linkedin_url: Some(String::new()),
            ..Profile::default()
        };
        assert_eq!(compute_completeness(Some(&profile)), 0);
        assert!(missing_sections(Some(&profile)).contains(&"Profile Summary"));
        assert!(missing_sections(Some(&profile)).contains(&"LinkedIn Profile"));
    }
}
