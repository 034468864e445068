//! Overtime policy derivation.
//!
//! A location configures at most one of two overtime rules: a weekly
//! hours cap or a daily hours cap. The wage calculator consumes the
//! derived [`WagePolicy`]; with neither rule enabled, every hour is
//! normal.

use serde::{Deserialize, Serialize};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// How accumulated hours are scoped when deciding whether a shift crosses
/// the overtime threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvertimeMode {
  /// Cap applies to the whole ISO week.
  Weekly,
  /// Cap applies per calendar day.
  Daily,
}

/// The active overtime policy for a week's wage computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WagePolicy {
  pub mode:        OvertimeMode,
  pub hours_limit: f64,
  pub multiplier:  f64,
}

// ─── Configured rules ────────────────────────────────────────────────────────

/// One configured overtime rule, as stored in location settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRule {
  pub enabled:     bool,
  pub hours_limit: f64,
  pub multiplier:  f64,
}

/// Location-level schedule settings relevant to wage computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ot_week: Option<OvertimeRule>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ot_day:  Option<OvertimeRule>,
}

impl ScheduleSettings {
  /// Derive the active policy. The two rules are mutually exclusive; if a
  /// stored settings object nevertheless enables both, the weekly rule
  /// wins. Both disabled (or absent) means no overtime applies.
  pub fn policy(&self) -> Option<WagePolicy> {
    let enabled =
      |rule: Option<OvertimeRule>| rule.filter(|r| r.enabled);
    if let Some(rule) = enabled(self.ot_week) {
      return Some(WagePolicy {
        mode:        OvertimeMode::Weekly,
        hours_limit: rule.hours_limit,
        multiplier:  rule.multiplier,
      });
    }
    enabled(self.ot_day).map(|rule| WagePolicy {
      mode:        OvertimeMode::Daily,
      hours_limit: rule.hours_limit,
      multiplier:  rule.multiplier,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
