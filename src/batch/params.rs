//! Method parameter table and run variations.
//!
//! Purpose
//! -------
//! Map each supported estimation method to its mean infectious period and
//! mean reporting delay, and encode how a run variation overrides them.
//!
//! Key behaviors
//! -------------
//! - [`Method`] is a closed enum; [`Method::standard_params`] is a total
//!   `match`, so every method has parameters.
//! - [`Variation::Delays`] forces the `_globalrt` recovery rate.
//! - [`Variation::Gtd`] and [`Variation::Window`] take the delay from
//!   `_globalrt`; every other variation uses the method's own delay.
//!
//! Conventions
//! -----------
//! - Method and variation tags keep their leading underscore (`_RKI`,
//!   `_delays`) because they are spliced into file names.
//! - `gamma = 1 / infectious_days`.
use crate::batch::errors::{BatchError, BatchResult};
use std::{fmt, str::FromStr};

/// Source of an infectious-period / reporting-delay assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Eth,
    Rki,
    Ilmenau,
    Sdsc,
    Zi,
    Ages,
    Epiforecasts,
    Rtlive,
    Globalrt,
}

impl Method {
    /// Every method, in table order.
    pub const ALL: [Method; 9] = [
        Method::Eth,
        Method::Rki,
        Method::Ilmenau,
        Method::Sdsc,
        Method::Zi,
        Method::Ages,
        Method::Epiforecasts,
        Method::Rtlive,
        Method::Globalrt,
    ];

    /// Tag used in file names, e.g. `"_RKI"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Method::Eth => "_ETH",
            Method::Rki => "_RKI",
            Method::Ilmenau => "_Ilmenau",
            Method::Sdsc => "_SDSC",
            Method::Zi => "_Zi",
            Method::Ages => "_AGES",
            Method::Epiforecasts => "_epiforecasts",
            Method::Rtlive => "_rtlive",
            Method::Globalrt => "_globalrt",
        }
    }

    /// Published mean infectious period and mean delay of this method.
    pub fn standard_params(&self) -> MethodParams {
        let (infectious_days, delay_days) = match self {
            Method::Eth => (4.8, 11),
            Method::Rki => (4.0, 1),
            Method::Ilmenau => (5.6, 7),
            Method::Sdsc => (4.8, 10),
            Method::Zi => (5.0, 0),
            Method::Ages => (3.4, 0),
            Method::Epiforecasts => (3.6, 12),
            Method::Rtlive => (4.7, 12),
            Method::Globalrt => (5.0, 0),
        };
        MethodParams { infectious_days, delay_days }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Method {
    type Err = BatchError;

    /// Accepts the tag with or without its leading underscore, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('_');
        Method::ALL
            .into_iter()
            .find(|m| m.tag()[1..].eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BatchError::UnknownMethod { name: s.to_string() })
    }
}

/// Variation of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variation {
    /// Method parameters as published (`""`).
    #[default]
    Parameters,
    /// Method delay with the `_globalrt` recovery rate (`"_delays"`).
    Delays,
    /// Method recovery rate with the `_globalrt` delay (`"_GTD"`).
    Gtd,
    /// Preprocessed input with the `_globalrt` delay (`"_window"`).
    Window,
}

impl Variation {
    /// Tag used in file names (empty for [`Variation::Parameters`]).
    pub fn tag(&self) -> &'static str {
        match self {
            Variation::Parameters => "",
            Variation::Delays => "_delays",
            Variation::Gtd => "_GTD",
            Variation::Window => "_window",
        }
    }

    /// Human-readable name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Variation::Parameters => "parameters",
            Variation::Delays => "delays",
            Variation::Gtd => "GTD",
            Variation::Window => "window",
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Variation {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Variation::Parameters),
            "_delays" => Ok(Variation::Delays),
            "_GTD" => Ok(Variation::Gtd),
            "_window" => Ok(Variation::Window),
            _ => Err(BatchError::UnknownVariation { name: s.to_string() }),
        }
    }
}

/// Mean infectious period and mean reporting delay, both in days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodParams {
    pub infectious_days: f64,
    pub delay_days: i64,
}

impl MethodParams {
    /// # Errors
    /// `BatchError::InvalidConfig` if `infectious_days` is not finite and
    /// positive or `delay_days` is negative.
    pub fn new(infectious_days: f64, delay_days: i64) -> BatchResult<Self> {
        if !infectious_days.is_finite() || infectious_days <= 0.0 {
            return Err(BatchError::InvalidConfig {
                field: "infectious_days",
                reason: "must be finite and > 0",
            });
        }
        if delay_days < 0 {
            return Err(BatchError::InvalidConfig { field: "delay_days", reason: "must be >= 0" });
        }
        Ok(MethodParams { infectious_days, delay_days })
    }

    /// Recovery rate `1 / infectious_days`.
    pub fn gamma(&self) -> f64 {
        1.0 / self.infectious_days
    }
}

/// Parameters for every [`Method`], indexed by the enum.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    entries: [MethodParams; 9],
}

impl ParameterTable {
    /// Table with the published values of every method.
    pub fn standard() -> Self {
        ParameterTable { entries: Method::ALL.map(|m| m.standard_params()) }
    }

    /// Replace one method's parameters.
    pub fn with_params(mut self, method: Method, params: MethodParams) -> Self {
        self.entries[method.index()] = params;
        self
    }

    pub fn get(&self, method: Method) -> MethodParams {
        self.entries[method.index()]
    }

    /// Recovery rate for a run; `_delays` always uses `_globalrt`.
    pub fn gamma_for(&self, method: Method, variation: Variation) -> f64 {
        match variation {
            Variation::Delays => self.get(Method::Globalrt).gamma(),
            _ => self.get(method).gamma(),
        }
    }

    /// Date shift for a run; `_GTD` and `_window` use the `_globalrt` delay.
    pub fn delay_for(&self, method: Method, variation: Variation) -> i64 {
        match variation {
            Variation::Gtd | Variation::Window => self.get(Method::Globalrt).delay_days,
            _ => self.get(method).delay_days,
        }
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::standard()
    }
}
