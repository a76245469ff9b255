//! Feedback text generation.
//!
//! Pure function of (overall similarity, accumulated joint errors);
//! the same input always yields the same ordered output.

use crate::analysis::joints::JointErrors;

/// Build the ordered feedback list for one analysis session.
pub fn recommendations(similarity: f32, joint_errors: &JointErrors) -> Vec<String> {
    let mut out = Vec::new();

    if similarity < 60.0 {
        out.push(
            "Overall form needs significant improvement. Consider slowing down and focusing on proper technique."
                .to_string(),
        );
    } else if similarity < 80.0 {
        out.push("Good effort! Focus on the specific joint corrections mentioned below.".to_string());
    } else {
        out.push("Excellent form! Keep up the great work.".to_string());
    }

    if !joint_errors.critical.is_empty() {
        out.push("Critical issues detected - these could lead to injury if not corrected.".to_string());
    }

    // Joint-family reminders, fixed order, each at most once.
    if joint_errors.mentions("elbow") {
        out.push("Focus on elbow positioning - keep them aligned with your shoulders.".to_string());
    }
    if joint_errors.mentions("knee") {
        out.push("Pay attention to knee alignment - avoid inward collapse.".to_string());
    }
    if joint_errors.mentions("shoulder") {
        out.push("Maintain proper shoulder posture throughout the movement.".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_with(critical: &[&str], moderate: &[&str]) -> JointErrors {
        JointErrors {
            critical: critical.iter().map(|s| s.to_string()).collect(),
            moderate: moderate.iter().map(|s| s.to_string()).collect(),
            minor: Vec::new(),
        }
    }

    #[test]
    fn test_similarity_tiers() {
        let none = JointErrors::default();
        assert!(recommendations(59.9, &none)[0].contains("significant improvement"));
        assert!(recommendations(60.0, &none)[0].contains("Good effort"));
        assert!(recommendations(79.9, &none)[0].contains("Good effort"));
        assert!(recommendations(80.0, &none)[0].contains("Excellent form"));
    }

    #[test]
    fn test_critical_warning_only_when_critical_present() {
        let critical = errors_with(&["left_knee: 35.0° deviation (critical)"], &[]);
        let recs = recommendations(90.0, &critical);
        assert!(recs.iter().any(|r| r.contains("Critical issues")));

        let moderate = errors_with(&[], &["left_knee: 18.0° deviation (moderate)"]);
        let recs = recommendations(90.0, &moderate);
        assert!(!recs.iter().any(|r| r.contains("Critical issues")));
    }

    #[test]
    fn test_joint_family_reminders_in_fixed_order() {
        let errors = errors_with(
            &["right_shoulder: 45.0° deviation (critical)"],
            &["left_elbow: 18.0° deviation (moderate)", "left_knee: 20.0° deviation (moderate)"],
        );
        let recs = recommendations(70.0, &errors);
        let elbow = recs.iter().position(|r| r.contains("elbow positioning")).unwrap();
        let knee = recs.iter().position(|r| r.contains("knee alignment")).unwrap();
        let shoulder = recs.iter().position(|r| r.contains("shoulder posture")).unwrap();
        assert!(elbow < knee && knee < shoulder);
    }

    #[test]
    fn test_reminder_appears_at_most_once() {
        let errors = errors_with(
            &["left_elbow: 40.0° deviation (critical)"],
            &["right_elbow: 20.0° deviation (moderate)"],
        );
        let recs = recommendations(70.0, &errors);
        let count = recs.iter().filter(|r| r.contains("elbow positioning")).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_pure_and_deterministic() {
        let errors = errors_with(&["left_hip: 50.0° deviation (critical)"], &[]);
        let a = recommendations(42.0, &errors);
        let b = recommendations(42.0, &errors);
        assert_eq!(a, b);
    }

    #[test]
    fn test_clean_session_has_single_entry() {
        let recs = recommendations(95.0, &JointErrors::default());
        assert_eq!(recs.len(), 1);
    }
}
