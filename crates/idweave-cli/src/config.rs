use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use idweave::{
    Clock, CombGenerationMode, CombIdentificationGenerator, IdType,
    IdentificationGenerator, IdentificationGeneratorsConfiguration, MAX_DATA_CENTER_ID,
    MAX_MACHINE_ID, MIN_SHORT_ID_LENGTH, MongoIdentificationGenerator, MonotonicClock,
    NumeralSystem, ObjectIdDescriptor, SnowflakeIdentificationGenerator, StringIdentityGenerator,
    SystemClock, Uuid,
};

/// Which identifier kind to generate.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// 64-bit Snowflake ids, printed in decimal.
    Snowflake,
    /// COMB GUIDs.
    Comb,
    /// 24-character MongoDB-style ObjectIds.
    ObjectId,
    /// Snowflake ids rendered in `--radix`.
    String,
}

impl IdKind {
    pub fn id_type(self) -> IdType {
        match self {
            Self::Snowflake => IdType::of::<i64>(),
            Self::Comb => IdType::of::<Uuid>(),
            Self::ObjectId => IdType::of::<ObjectIdDescriptor>(),
            Self::String => IdType::of::<String>(),
        }
    }
}

/// COMB byte layout, named after the database comparison it targets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombModeArg {
    AsString,
    AsBinary,
    AtEnd,
}

impl From<CombModeArg> for CombGenerationMode {
    fn from(mode: CombModeArg) -> Self {
        match mode {
            CombModeArg::AsString => Self::AsString,
            CombModeArg::AsBinary => Self::AsBinary,
            CombModeArg::AtEnd => Self::AtEnd,
        }
    }
}

/// Time source handed to the generators.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockArg {
    /// The OS wall clock, read on every call.
    System,
    /// Anchored to the wall clock once, then advanced by a monotonic timer.
    Monotonic,
}

/// Command-line configuration for the `idweave` binary.
///
/// Every option may also be supplied through the environment, or a `.env`
/// file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idweave",
    version,
    about = "Generate Snowflake, COMB, ObjectId and string identifiers"
)]
pub struct CliArgs {
    /// Identifier kind to generate.
    ///
    /// Environment variable: `ID_KIND`
    #[arg(long, env = "ID_KIND", value_enum, default_value_t = IdKind::Snowflake)]
    pub kind: IdKind,

    /// Number of identifiers to print, one per line.
    ///
    /// Environment variable: `ID_COUNT`
    #[arg(short = 'n', long, env = "ID_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Snowflake machine id (0-15). Also used by `--kind string`.
    ///
    /// Environment variable: `MACHINE_ID`
    #[arg(long, env = "MACHINE_ID", default_value_t = 0)]
    pub machine_id: u8,

    /// Snowflake data-center id (0-15). Also used by `--kind string`.
    ///
    /// Environment variable: `DATA_CENTER_ID`
    #[arg(long, env = "DATA_CENTER_ID", default_value_t = 0)]
    pub data_center_id: u8,

    /// COMB layout.
    ///
    /// Environment variable: `COMB_MODE`
    #[arg(long, env = "COMB_MODE", value_enum, default_value_t = CombModeArg::AtEnd)]
    pub comb_mode: CombModeArg,

    /// Radix for `--kind string` (2-62).
    ///
    /// Environment variable: `ID_RADIX`
    #[arg(long, env = "ID_RADIX", default_value_t = 52)]
    pub radix: usize,

    /// Keep only the trailing characters of each string id. Shorter ids are
    /// more likely to collide.
    ///
    /// Environment variable: `SHORT_LENGTH`
    #[arg(long, env = "SHORT_LENGTH")]
    pub short_length: Option<usize>,

    /// Time source.
    ///
    /// Environment variable: `ID_CLOCK`
    #[arg(long, env = "ID_CLOCK", value_enum, default_value_t = ClockArg::Monotonic)]
    pub clock: ClockArg,

    /// Emit logs as JSON lines on stderr.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub kind: IdKind,
    pub count: usize,
    pub machine_id: u8,
    pub data_center_id: u8,
    pub comb_mode: CombGenerationMode,
    pub numeral: NumeralSystem,
    pub short_length: Option<usize>,
    pub clock: ClockArg,
    pub log_json: bool,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("ID_COUNT must be greater than 0");
        }

        if args.machine_id > MAX_MACHINE_ID {
            bail!(
                "MACHINE_ID ({}) exceeds the Snowflake machine id space (max = {})",
                args.machine_id,
                MAX_MACHINE_ID
            );
        }

        if args.data_center_id > MAX_DATA_CENTER_ID {
            bail!(
                "DATA_CENTER_ID ({}) exceeds the Snowflake data-center id space (max = {})",
                args.data_center_id,
                MAX_DATA_CENTER_ID
            );
        }

        let numeral = NumeralSystem::new(args.radix)?;

        if let Some(short_length) = args.short_length {
            if args.kind != IdKind::String {
                bail!("SHORT_LENGTH only applies to `--kind string`");
            }
            if short_length < MIN_SHORT_ID_LENGTH {
                bail!(
                    "SHORT_LENGTH ({short_length}) must be at least {MIN_SHORT_ID_LENGTH}"
                );
            }
            // Longest rendering in this radix, including the sign.
            let max_length = numeral.encode(i64::MIN).len();
            if short_length > max_length {
                bail!(
                    "SHORT_LENGTH ({short_length}) exceeds the longest radix-{} id (max = {max_length})",
                    numeral.radix()
                );
            }
        }

        Ok(Self {
            kind: args.kind,
            count: args.count,
            machine_id: args.machine_id,
            data_center_id: args.data_center_id,
            comb_mode: args.comb_mode.into(),
            numeral,
            short_length: args.short_length,
            clock: args.clock,
            log_json: args.log_json,
        })
    }
}

impl CliConfig {
    /// One generator per identifier kind, wired from the command line. The
    /// string generator renders the Snowflake generator's ids.
    pub fn generators(&self) -> anyhow::Result<IdentificationGeneratorsConfiguration> {
        let snowflake: Arc<dyn IdentificationGenerator<i64>> = Arc::new(
            SnowflakeIdentificationGenerator::new(self.machine_id, self.data_center_id)?,
        );

        Ok(IdentificationGeneratorsConfiguration {
            int64: Some(Arc::clone(&snowflake)),
            guid: Some(Arc::new(CombIdentificationGenerator::new(self.comb_mode))),
            object_id: Some(Arc::new(MongoIdentificationGenerator::new())),
            string: Some(Arc::new(StringIdentityGenerator::new(
                snowflake,
                self.numeral.clone(),
            ))),
        })
    }

    /// A standalone string generator, for short ids.
    pub fn string_generator(&self) -> anyhow::Result<StringIdentityGenerator> {
        let snowflake =
            SnowflakeIdentificationGenerator::new(self.machine_id, self.data_center_id)?;
        Ok(StringIdentityGenerator::new(
            Arc::new(snowflake),
            self.numeral.clone(),
        ))
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.clock {
            ClockArg::System => Arc::new(SystemClock::utc()),
            ClockArg::Monotonic => Arc::new(MonotonicClock::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(["idweave"].iter().chain(args))?;
        CliConfig::try_from(args)
    }

    #[test]
    fn defaults_generate_one_snowflake() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.kind, IdKind::Snowflake);
        assert_eq!(config.count, 1);
        assert_eq!(config.comb_mode, CombGenerationMode::AtEnd);
        assert_eq!(config.numeral.radix(), 52);
        assert_eq!(config.clock, ClockArg::Monotonic);
    }

    #[test]
    fn value_enums_use_kebab_case() {
        let config = parse(&["--kind", "object-id", "--comb-mode", "as-binary", "--clock", "system"])
            .unwrap();
        assert_eq!(config.kind, IdKind::ObjectId);
        assert_eq!(config.comb_mode, CombGenerationMode::AsBinary);
        assert_eq!(config.clock, ClockArg::System);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["--count", "0"]).is_err());
        assert!(parse(&["--machine-id", "16"]).is_err());
        assert!(parse(&["--data-center-id", "20"]).is_err());
        assert!(parse(&["--radix", "63"]).is_err());
    }

    #[test]
    fn short_length_needs_string_kind() {
        assert!(parse(&["--short-length", "8"]).is_err());
        assert!(parse(&["--kind", "string", "--short-length", "5"]).is_err());

        let config = parse(&["--kind", "string", "--short-length", "8"]).unwrap();
        assert_eq!(config.short_length, Some(8));
    }

    #[test]
    fn short_length_is_bounded_by_the_radix() {
        // radix 52 renders at most 13 characters, radix 16 at most 17.
        assert!(parse(&["--kind", "string", "--short-length", "40"]).is_err());
        assert!(parse(&["--kind", "string", "--short-length", "14"]).is_err());
        assert!(parse(&["--kind", "string", "--short-length", "13"]).is_ok());
        assert!(parse(&["--kind", "string", "--radix", "16", "--short-length", "17"]).is_ok());
    }

    #[test]
    fn generators_fill_every_kind() {
        let config = parse(&["--machine-id", "3"]).unwrap();
        let generators = config.generators().unwrap();
        assert!(generators.int64.is_some());
        assert!(generators.guid.is_some());
        assert!(generators.object_id.is_some());
        assert!(generators.string.is_some());
    }
}
