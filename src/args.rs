use clap::Parser;

/// Web lookup of 2017 UK General Election results by postcode.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The port the web server listens on.
    #[clap(short, long, value_parser, default_value_t = 8000)]
    pub port: u16,

    /// (file path) The election-results workbook (xlsx). One row per candidate,
    /// with the constituency name, vote share, turnout, electorate, pre-election
    /// status, party and party colour.
    #[clap(long, value_parser, default_value = "static/election_mapping.xlsx")]
    pub results: String,

    /// (file path) The MP-profile table (CSV with Name and URI columns), used to
    /// link winning candidates to their public profile.
    #[clap(long, value_parser, default_value = "static/names.csv")]
    pub profiles: String,

    /// Base URL of the postcode geocoding service.
    #[clap(long, value_parser, default_value = "http://api.postcodes.io")]
    pub geocoder_url: String,

    /// Timeout in seconds for a single geocoding request.
    #[clap(long, value_parser, default_value_t = 5)]
    pub geocoder_timeout_secs: u64,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
