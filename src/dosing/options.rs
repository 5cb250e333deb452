use serde::{Deserialize, Serialize};

/// Dose engine configuration
///
/// The defaults implement the institutional rules: clearance is capped at 125 mL/min
/// before the Calvert formula and maximum doses are flagged.
///
/// Options can be read from JSON; missing fields take their default:
///
/// ```rust
/// use oncosol::dosing::DosingOptions;
///
/// let options: DosingOptions = serde_json::from_str(r#"{ "gfr_cap": null }"#).unwrap();
/// assert_eq!(options.gfr_cap, None);
/// assert_eq!(options.calvert_offset, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosingOptions {
    /// Upper bound on GFR used by the Calvert formula, mL/min (None = uncapped)
    pub gfr_cap: Option<f64>,
    /// Constant added to GFR in the Calvert formula (default: 25)
    pub calvert_offset: f64,
    /// Emit a warning when a computed dose exceeds the drug's `max_dose_mg`
    ///
    /// Doses are never clamped.
    pub flag_max_dose: bool,
}

impl Default for DosingOptions {
    fn default() -> Self {
        Self {
            gfr_cap: Some(125.0),
            calvert_offset: 25.0,
            flag_max_dose: true,
        }
    }
}

impl DosingOptions {
    /// Set the Calvert GFR cap
    pub fn with_gfr_cap(mut self, cap: f64) -> Self {
        self.gfr_cap = Some(cap);
        self
    }

    /// Use the measured GFR as-is in the Calvert formula
    pub fn without_gfr_cap(mut self) -> Self {
        self.gfr_cap = None;
        self
    }

    /// Set the Calvert offset
    pub fn with_calvert_offset(mut self, offset: f64) -> Self {
        self.calvert_offset = offset;
        self
    }

    /// Enable or disable max-dose warnings
    pub fn with_max_dose_flag(mut self, flag: bool) -> Self {
        self.flag_max_dose = flag;
        self
    }

    /// GFR after applying the cap
    pub fn capped_gfr(&self, gfr: f64) -> f64 {
        match self.gfr_cap {
            Some(cap) => gfr.min(cap),
            None => gfr,
        }
    }
}
