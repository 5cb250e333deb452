//! Ann Arbor lymphoma staging

/// Modifier selections that mean "no modifier"
const NO_MODIFIER: [&str; 3] = ["", "-", "?"];

/// Compound Ann Arbor stage from region stage, symptom code and modifier
///
/// Symptoms are only used when they are `A` or `B`; the modifier is dropped when it
/// is `-` or unselected.
///
/// ```rust
/// use oncosol::staging::compose_ann_arbor;
///
/// assert_eq!(compose_ann_arbor("II", "B", "X"), "IIB X");
/// assert_eq!(compose_ann_arbor("III", "A", "-"), "IIIA");
/// assert_eq!(compose_ann_arbor("I", "?", "?"), "I");
/// ```
pub fn compose_ann_arbor(stage: &str, symptoms: &str, modifier: &str) -> String {
    let stage = stage.trim();
    let symptoms = match symptoms.trim() {
        s @ ("A" | "B") => s,
        _ => "",
    };
    let modifier = modifier.trim();

    if NO_MODIFIER.contains(&modifier) {
        format!("{}{}", stage, symptoms)
    } else {
        format!("{}{} {}", stage, symptoms, modifier)
    }
}
