use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("cloudhunt")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("cloudhunt")
        .about("Searches for AWS, Azure and Google cloud storage belonging to an organization")
        .styles(CLAP_STYLING)
        .arg(
            arg!(<INPUT>)
                .required(true)
                .help("Company name, base name or URL (starting with http) to hunt from"),
        )
        .arg(
            arg!(-p --"permutations-file" <PATH>)
                .required(false)
                .help("Newline-delimited affix list used to build name permutations (default: bundled list)"),
        )
        .arg(
            arg!(-r --"resolvers" <PATH>)
                .required(false)
                .help("Newline-delimited DNS resolver list (default: bundled list)"),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The number of async workers in the probing pool (max 300)")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(-c --"crawl-deep" <DEPTH>)
                .required(false)
                .help("How many levels of pages to crawl after the first (URL input only)")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            arg!(-b --"base-only")
                .required(false)
                .help("Check only the base name, skip permutation generation")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-d --"disable-bruteforce")
                .required(false)
                .help("Disable discovery by brute force")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-a --"no-active-crawl")
                .required(false)
                .help("Do not fetch scripts, stylesheets and data files while crawling")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-v --"verbose")
                .required(false)
                .help("Debug logging and raw ACL output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-o --"open-only")
                .required(false)
                .help("Show only open buckets")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"output" <PATH>)
                .required(false)
                .help("Where to write the JSON report (default: {base}-output.json)"),
        )
        .arg(
            arg!(-q --"quiet")
                .required(false)
                .help("Suppress the banner")
                .action(clap::ArgAction::SetTrue),
        )
}
