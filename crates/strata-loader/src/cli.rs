//! Command-line argument property source.
//!
//! Arguments of the form `--key=value` become properties; `--key`
//! alone becomes the empty string. Bracket indices (`--key[0]=a
//! --key[1]=b`) express lists. Anything not starting with `--` is
//! ignored.

use strata_core::PropertySource;

/// Display name of the command-line property source.
pub const COMMAND_LINE_SOURCE: &str = "command-line";

/// Parses command-line arguments into the highest-precedence property
/// source. Later occurrences of the same key win.
pub fn command_line_source(args: &[String]) -> PropertySource {
    let mut source = PropertySource::new(COMMAND_LINE_SOURCE);

    for arg in args {
        let Some(option) = arg.strip_prefix("--") else {
            continue;
        };
        source = match option.split_once('=') {
            Some((key, value)) => source.with(key, value),
            None => source.with(option, ""),
        };
    }

    source
}
