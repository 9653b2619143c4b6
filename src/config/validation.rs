use super::defaults::{
    MAX_BLOCK_SIZE, MAX_CAPTURE_SECONDS, MAX_QUEUE_CAPACITY, MAX_UNIT_LABEL_CHARS, MIN_BLOCK_SIZE,
    SUPPORTED_SAMPLE_RATES,
};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize labels.
    pub fn validate(&mut self) -> Result<()> {
        if !self.seconds.is_finite() || self.seconds <= 0.0 || self.seconds > MAX_CAPTURE_SECONDS {
            bail!(
                "--seconds must be greater than 0 and at most {MAX_CAPTURE_SECONDS}, got {}",
                self.seconds
            );
        }
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be one of {}, got {}",
                join_rates(SUPPORTED_SAMPLE_RATES),
                self.sample_rate
            );
        }
        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&self.block_size) {
            bail!(
                "--block-size must be between {MIN_BLOCK_SIZE} and {MAX_BLOCK_SIZE}, got {}",
                self.block_size
            );
        }
        if !(1..=MAX_QUEUE_CAPACITY).contains(&self.queue_capacity) {
            bail!(
                "--queue-capacity must be between 1 and {MAX_QUEUE_CAPACITY}, got {}",
                self.queue_capacity
            );
        }

        if self.eu_sensitivity.len() > 2 {
            bail!(
                "--eu-sensitivity accepts at most 2 values (one per channel), got {}",
                self.eu_sensitivity.len()
            );
        }
        for (ch, mv) in self.eu_sensitivity.iter().enumerate() {
            if !mv.is_finite() || *mv < 0.0 {
                bail!(
                    "--eu-sensitivity for channel {} must be a non-negative number, got {mv}",
                    ch + 1
                );
            }
        }

        if self.eu_units.len() > 2 {
            bail!(
                "--eu-units accepts at most 2 values (one per channel), got {}",
                self.eu_units.len()
            );
        }
        for unit in &mut self.eu_units {
            let trimmed = unit.trim();
            if trimmed.is_empty() {
                bail!("--eu-units must not be empty");
            }
            if trimmed.chars().count() > MAX_UNIT_LABEL_CHARS {
                bail!("--eu-units label '{trimmed}' exceeds {MAX_UNIT_LABEL_CHARS} characters");
            }
            if trimmed.chars().any(|ch| ch.is_control() || ch == ',') {
                bail!("--eu-units label '{trimmed}' contains a comma or control character");
            }
            *unit = trimmed.to_string();
        }

        if let Some(name) = &self.host_api {
            if name.trim().is_empty() {
                bail!("--host-api must not be empty");
            }
        }

        Ok(())
    }

    /// Whether any tracing subscriber should be installed.
    pub fn logging_enabled(&self) -> bool {
        !self.no_logs
    }
}

fn join_rates(rates: &[u32]) -> String {
    rates
        .iter()
        .map(|rate| rate.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
