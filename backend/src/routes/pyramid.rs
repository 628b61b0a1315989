use std::collections::BTreeMap;

/// Successful-ascent count per raw grade label.
pub type GradePyramid = BTreeMap<String, usize>;
