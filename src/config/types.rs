//! Configuration types for the roster engine.
//!
//! These types mirror the YAML files under a configuration directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculation::DEFAULT_CACHE_CAPACITY;
use crate::models::{RateTable, RuleConfig, SalaryInfo, ScheduleGrid, TaxSettings, TimeSlot};

/// Contents of `rules.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Workforce rules for schedule validation.
    pub rules: RuleConfig,
    /// The default slot grid for a day.
    pub grid: ScheduleGrid,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            grid: ScheduleGrid {
                start_time: TimeSlot::from_minutes(9 * 60),
                end_time: TimeSlot::from_minutes(23 * 60),
                interval_minutes: 30,
            },
        }
    }
}

/// Contents of `settlement.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Salary used when neither the request nor the role supplies one.
    #[serde(default)]
    pub default_salary: SalaryInfo,
    /// Tax used when the request supplies none.
    #[serde(default)]
    pub default_tax: TaxSettings,
    /// Salary per job role.
    #[serde(default)]
    pub role_salaries: BTreeMap<String, SalaryInfo>,
    /// Most settlement results the shared cache holds.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            default_salary: SalaryInfo::default(),
            default_tax: TaxSettings::default(),
            role_salaries: BTreeMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    rules: RulesConfig,
    rates: RateTable,
    settlement: SettlementConfig,
}

impl EngineConfig {
    /// Creates a new `EngineConfig` from its components.
    pub fn new(rules: RulesConfig, rates: RateTable, settlement: SettlementConfig) -> Self {
        Self {
            rules,
            rates,
            settlement,
        }
    }

    /// Returns the validation rules.
    pub fn rules(&self) -> &RuleConfig {
        &self.rules.rules
    }

    /// Returns the default slot grid.
    pub fn grid(&self) -> &ScheduleGrid {
        &self.rules.grid
    }

    /// Returns the payroll rate table.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Returns the settlement defaults.
    pub fn settlement(&self) -> &SettlementConfig {
        &self.settlement
    }
}
