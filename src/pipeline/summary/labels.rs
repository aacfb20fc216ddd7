use super::document::FieldKind;

/// Separates a bold label from its value: `- **医院**: 市中心医院`.
pub const LABEL_TERMINATOR: &str = "**:";

/// Label patterns in priority order. The first pattern contained in a line
/// decides its kind; anything unmatched is `FieldKind::Generic`.
pub const LABEL_RULES: &[(&str, FieldKind)] = &[
    ("**医院**:", FieldKind::Hospital),
    ("**医院/机构**:", FieldKind::Hospital),
    ("**Hospital**:", FieldKind::Hospital),
    ("**重要检查检验结果**:", FieldKind::Findings),
    ("**重要检查结果**:", FieldKind::Findings),
    ("**Key Findings**:", FieldKind::Findings),
    ("**用药方案**:", FieldKind::MedicationPlan),
    ("**Medication Plan**:", FieldKind::MedicationPlan),
    ("**治疗效果**:", FieldKind::Outcome),
    ("**Outcome**:", FieldKind::Outcome),
    ("**下次治疗时间**:", FieldKind::NextAppointment),
    ("**Next Appointment**:", FieldKind::NextAppointment),
];

/// Classify a cleaned field line.
pub fn classify(line: &str) -> FieldKind {
    LABEL_RULES
        .iter()
        .find(|(pattern, _)| line.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or(FieldKind::Generic)
}
