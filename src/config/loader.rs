//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::calculation::salary_for_role;
use crate::error::{EngineError, EngineResult};
use crate::models::{RateTable, RuleConfig, SalaryInfo, ScheduleGrid, TaxSettings};

use super::types::{EngineConfig, RulesConfig, SettlementConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── rules.yaml       # Validation rules and the default slot grid
/// ├── payroll.yaml     # Rate table by job role and overtime rules
/// └── settlement.yaml  # Default salary, default tax, salary per role
/// ```
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Overtime multiplier: {}", loader.rate_table().overtime_multiplier);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] when a file is missing
    /// - [`EngineError::ConfigParseError`] when a file is not valid YAML for
    ///   its type
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rules = Self::load_yaml::<RulesConfig>(&path.join("rules.yaml"))?;
        let rates = Self::load_yaml::<RateTable>(&path.join("payroll.yaml"))?;
        let settlement = Self::load_yaml::<SettlementConfig>(&path.join("settlement.yaml"))?;

        info!(
            path = %path.display(),
            roles = rates.rates.len(),
            role_salaries = settlement.role_salaries.len(),
            "Configuration loaded"
        );

        Ok(Self {
            config: EngineConfig::new(rules, rates, settlement),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the validation rules.
    pub fn rules(&self) -> &RuleConfig {
        self.config.rules()
    }

    /// Returns the default slot grid.
    pub fn grid(&self) -> &ScheduleGrid {
        self.config.grid()
    }

    /// Returns the payroll rate table.
    pub fn rate_table(&self) -> &RateTable {
        self.config.rates()
    }

    /// Returns the tax applied when a request supplies none.
    pub fn default_tax(&self) -> TaxSettings {
        self.config.settlement().default_tax
    }

    /// Resolves the salary for a role: an explicit override, then the
    /// configured role salary, then the default salary.
    pub fn salary_for(&self, role: Option<&str>, override_salary: Option<SalaryInfo>) -> SalaryInfo {
        let settlement = self.config.settlement();
        salary_for_role(
            role,
            &settlement.role_salaries,
            override_salary,
            settlement.default_salary,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SalaryType;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_config() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
    }

    #[test]
    fn test_loaded_rate_table() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let table = loader.rate_table();

        assert_eq!(table.rates.get("dealer"), Some(&Decimal::from(18000)));
        assert_eq!(table.rates.get("tournament_director"), Some(&Decimal::from(300000)));
        assert_eq!(table.salary_type_for("tournament_director"), SalaryType::Daily);
        assert_eq!(table.salary_type_for("dealer"), SalaryType::Hourly);
        assert_eq!(table.default_role, "default");
        assert_eq!(table.overtime_multiplier, Decimal::new(15, 1));
        assert_eq!(table.daily_regular_hours, Decimal::from(8));
    }

    #[test]
    fn test_loaded_rules_and_grid() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.rules().max_continuous_minutes, 240);
        assert_eq!(loader.rules().min_rest_minutes, 30);
        assert_eq!(loader.grid().interval_minutes, 30);
        assert!(!loader.grid().slots().is_empty());
    }

    #[test]
    fn test_salary_resolution() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let manager = loader.salary_for(Some("manager"), None);
        assert_eq!(manager.salary_type, SalaryType::Daily);

        let unknown = loader.salary_for(Some("juggler"), None);
        assert_eq!(unknown, SalaryInfo::default());

        let custom = SalaryInfo::hourly(Decimal::from(99000));
        assert_eq!(loader.salary_for(Some("manager"), Some(custom)), custom);
    }

    #[test]
    fn test_missing_directory_returns_config_not_found() {
        let result = ConfigLoader::load("./nonexistent/path");
        match result {
            Err(EngineError::ConfigNotFound { path }) => assert!(path.contains("rules.yaml")),
            other => panic!("Expected ConfigNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("roster_cfg_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("rules.yaml"), "rules: [not, a, map]\n").unwrap();

        let result = ConfigLoader::load(&dir);
        let _ = fs::remove_dir_all(&dir);

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => assert!(path.contains("rules.yaml")),
            other => panic!("Expected ConfigParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_default_loader_matches_builtin_defaults() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.rate_table(), &RateTable::default());
        assert_eq!(loader.default_tax(), TaxSettings::none());
    }
}
