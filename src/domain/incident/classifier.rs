//! Escalation classifier.
//!
//! Decides whether a newly reported incident warrants a global siren.
//! The rules are a heuristic safety net: a miss is recovered by an operator
//! triggering the siren by hand, and a false alarm is absorbed by the
//! registry's replace-on-duplicate behaviour.

/// Severity value that always escalates.
pub const CRITICAL_SEVERITY: &str = "critical";

/// Incident types that always escalate.
pub const HIGH_ACUITY_TYPES: &[&str] = &["medical", "accident"];

/// Phrases that escalate when found anywhere in the lower-cased description.
pub const CRITICAL_KEYWORDS: &[&str] = &["critical", "serious", "heart attack", "unconscious"];

/// Which rule caused an escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationTrigger {
    CriticalSeverity,
    HighAcuityType,
    CriticalKeyword(&'static str),
}

impl std::fmt::Display for EscalationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscalationTrigger::CriticalSeverity => write!(f, "critical_severity"),
            EscalationTrigger::HighAcuityType => write!(f, "high_acuity_type"),
            EscalationTrigger::CriticalKeyword(keyword) => write!(f, "keyword:{}", keyword),
        }
    }
}

/// Returns the first matching escalation rule, or `None`.
///
/// Rules are checked in order: severity, incident type, description keywords.
/// Severity and type are compared exactly; keywords by case-insensitive
/// substring containment.
pub fn escalation(severity: &str, incident_type: &str, description: &str) -> Option<EscalationTrigger> {
    if severity == CRITICAL_SEVERITY {
        return Some(EscalationTrigger::CriticalSeverity);
    }

    if HIGH_ACUITY_TYPES.contains(&incident_type) {
        return Some(EscalationTrigger::HighAcuityType);
    }

    let lowered = description.to_lowercase();
    CRITICAL_KEYWORDS
        .iter()
        .find(|keyword| lowered.contains(*keyword))
        .map(|keyword| EscalationTrigger::CriticalKeyword(keyword))
}

/// True when the incident qualifies as a global critical alert.
pub fn classify(severity: &str, incident_type: &str, description: &str) -> bool {
    escalation(severity, incident_type, description).is_some()
}
