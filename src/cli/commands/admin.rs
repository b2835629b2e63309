use clap::{builder::BoolishValueParser, Arg, ArgAction, ArgMatches, Command};

pub const ARG_WEBHOOKS_ENABLED: &str = "webhooks-enabled";
pub const ARG_CORE_TYPES: &str = "core-types";
pub const ARG_FALLBACK_TYPE: &str = "fallback-type";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub webhooks_enabled: bool,
    pub core_types: Option<Vec<String>>,
    pub fallback_type: Option<String>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            webhooks_enabled: matches.get_flag(ARG_WEBHOOKS_ENABLED),
            core_types: matches
                .get_many::<String>(ARG_CORE_TYPES)
                .map(|values| values.cloned().collect()),
            fallback_type: matches.get_one::<String>(ARG_FALLBACK_TYPE).cloned(),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_WEBHOOKS_ENABLED)
                .long(ARG_WEBHOOKS_ENABLED)
                .help("Allow admins to manage webhooks")
                .env("QADMIN_WEBHOOKS_ENABLED")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_CORE_TYPES)
                .long(ARG_CORE_TYPES)
                .help("Content types a webhook may filter on (comma separated)")
                .env("QADMIN_CORE_TYPES")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new(ARG_FALLBACK_TYPE)
                .long(ARG_FALLBACK_TYPE)
                .help("Type filter used when a webhook asks for a type outside the core types")
                .env("QADMIN_FALLBACK_TYPE"),
        )
}
