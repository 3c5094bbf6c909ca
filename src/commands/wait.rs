//! [`Wait`] command: pauses execution.
//!
//! Script syntax: `Wait 500`, `Wait 1.5s`, or `Wait 200 800` for a random
//! pause between the two bounds.

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::compiler::parse_duration;
use crate::error::PrepareError;
use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Pauses for `min`, or for a uniformly random duration in `min..=max`.
///
/// The pause ends early when the run is stopped.
#[derive(Debug, Default)]
pub struct Wait {
    pub min: Duration,
    pub max: Duration,
}

impl Wait {
    pub const NAME: &'static str = "Wait";

    fn pick(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let ms = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(ms as u64)
    }
}

#[async_trait]
impl MacroCommand for Wait {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        let min = parse_duration(scope.param(0).unwrap_or_default())
            .map_err(PrepareError::InvalidParameters)?;
        let max = match scope.param(1) {
            Some(raw) => parse_duration(raw).map_err(PrepareError::InvalidParameters)?,
            None => min,
        };
        if max < min {
            return Err(PrepareError::invalid(format!(
                "upper bound {}ms is below lower bound {}ms",
                max.as_millis(),
                min.as_millis()
            )));
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.sleep(self.pick()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::prepare_params;

    fn prepared(params: &[&str]) -> Result<Wait, PrepareError> {
        let mut wait = Wait::default();
        prepare_params(&mut wait, params)?;
        Ok(wait)
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(prepared(&["500"]).unwrap().min, Duration::from_millis(500));
        assert_eq!(prepared(&["500ms"]).unwrap().max, Duration::from_millis(500));
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(prepared(&["1.5s"]).unwrap().min, Duration::from_secs_f64(1.5));
    }

    #[test]
    fn test_parse_range() {
        let wait = prepared(&["100", "250"]).unwrap();
        assert_eq!(wait.min, Duration::from_millis(100));
        assert_eq!(wait.max, Duration::from_millis(250));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(prepared(&["5minutes"]).is_err());
        assert!(prepared(&["500", "100"]).is_err());
    }

    #[test]
    fn test_pick_stays_in_range() {
        let wait = Wait {
            min: Duration::from_millis(10),
            max: Duration::from_millis(20),
        };
        for _ in 0..100 {
            let d = wait.pick();
            assert!(d >= wait.min && d <= wait.max, "{d:?}");
        }
    }

    #[test]
    fn test_pick_fixed() {
        let wait = Wait {
            min: Duration::from_millis(7),
            max: Duration::from_millis(7),
        };
        assert_eq!(wait.pick(), Duration::from_millis(7));
    }
}
