use std::fs::read_to_string;
use std::time::Duration;

use clap::{arg, ArgMatches, Command};
use colored::Colorize;
use eyre::{bail, eyre, Result, WrapErr};
use serde::Deserialize;
use serde::Serialize;

use property_portfolio::client::PropertyApi;
use property_portfolio::format::{format_currency, ChartSeries};
use property_portfolio::{
    property, report, summarize, GrowthView, GrowthWindow, NewProperty, Portfolio, Property,
    Session,
};

#[derive(Serialize, Deserialize)]
struct Config {
    api_url: String,
    token: String,
    user_id: String,
    properties_file: String,
    timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            token: String::new(),
            user_id: String::new(),
            properties_file: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    // environment variables win over the config file
    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("PROPFOLIO_API_URL") {
            self.api_url = url;
        }
        if let Ok(token) = std::env::var("PROPFOLIO_TOKEN") {
            self.token = token;
        }
        if let Ok(user_id) = std::env::var("PROPFOLIO_USER_ID") {
            self.user_id = user_id;
        }
        self
    }

    fn session(&self) -> Result<Session> {
        Session::new(self.token.as_str(), self.user_id.as_str()).wrap_err(
            "set token and user_id in the config file or PROPFOLIO_TOKEN / PROPFOLIO_USER_ID",
        )
    }

    fn api(&self) -> Result<PropertyApi> {
        Ok(PropertyApi::new(
            &self.api_url,
            Duration::from_secs(self.timeout_secs),
        )?)
    }
}

fn file_arg() -> clap::Arg {
    arg!([FILE] "JSON file with your properties (defaults to the backend)")
}

fn cli() -> Command {
    Command::new("propfolio")
        .about("Track the value growth of your property portfolio")
        .arg_required_else_help(true)
        .subcommand(Command::new("config").about("Print the path to the config file"))
        .subcommand(
            Command::new("properties")
                .about("List your properties with their latest value and 3 year growth")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("summary")
                .about("Summarize the value and appreciation of your portfolio")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("growth")
                .about("Show value and growth details of a single property")
                .arg(arg!(<INDEX> "Property number as shown by `properties`"))
                .arg(file_arg())
                .arg(
                    arg!(-w --window <WINDOW> "Growth window shown first: 5, 3 or 1")
                        .required(false)
                        .default_value("5"),
                ),
        )
        .subcommand(
            Command::new("chart")
                .about("Show the portfolio value over the years")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("add")
                .about("Add a property")
                .arg(arg!(--size <SQFT> "Size in sqft"))
                .arg(arg!(--"area-type" <AREA> "URBAN or RURAL"))
                .arg(arg!(--"land-type" <LAND> "RESIDENTIAL or COMMERCIAL"))
                .arg(arg!(--lat <LATITUDE> "Latitude in decimal degrees").allow_hyphen_values(true))
                .arg(arg!(--lng <LONGITUDE> "Longitude in decimal degrees").allow_hyphen_values(true)),
        )
}

fn open_encrypted_file(filename: &str) -> Result<String> {
    let output = std::process::Command::new("gpg")
        .arg("-d")
        .arg(filename)
        .output()
        .wrap_err("failed to execute gpg process")?;
    if !output.status.success() {
        bail!("gpg could not decrypt {filename}");
    }
    Ok(String::from_utf8(output.stdout)?)
}

fn read_properties_file(filename: &str) -> Result<Vec<Property>> {
    let data = if filename.ends_with(".gpg") {
        open_encrypted_file(filename)?
    } else {
        read_to_string(filename).wrap_err_with(|| format!("Error reading file: {filename}"))?
    };
    property::from_string(&data).wrap_err_with(|| format!("{filename} is not a valid property list"))
}

// argument first, then the config file; empty means "ask the backend"
fn properties_file(matches: &ArgMatches, cfg: &Config) -> Option<String> {
    matches
        .get_one::<String>("FILE")
        .filter(|f| !f.is_empty())
        .cloned()
        .or_else(|| Some(cfg.properties_file.clone()).filter(|f| !f.is_empty()))
}

async fn load_properties(matches: &ArgMatches, cfg: &Config) -> Result<Vec<Property>> {
    match properties_file(matches, cfg) {
        Some(filename) => read_properties_file(&filename),
        None => Ok(cfg.api()?.list_properties(&cfg.session()?).await?),
    }
}

// Prefer the backend's own aggregate; fall back to summing the properties.
async fn load_portfolio(matches: &ArgMatches, cfg: &Config) -> Result<Portfolio> {
    if let Some(filename) = properties_file(matches, cfg) {
        return Ok(Portfolio::from_properties(&read_properties_file(&filename)?));
    }

    let dashboard = cfg.api()?.dashboard(&cfg.session()?).await;
    for error in &dashboard.errors {
        eprintln!("{} {error}", "Warning:".yellow().bold());
    }
    match (dashboard.portfolio, dashboard.properties) {
        (Some(portfolio), _) => Ok(portfolio),
        (None, Some(properties)) => Ok(Portfolio::from_properties(&properties)),
        (None, None) => Err(eyre!("could not load portfolio data from {}", cfg.api_url)),
    }
}

fn select_property(properties: &[Property], index: &str) -> Result<(usize, Property)> {
    let number: usize = index
        .parse()
        .wrap_err_with(|| format!("invalid property number: {index}"))?;
    if number == 0 || number > properties.len() {
        bail!(
            "property {number} does not exist, you have {} properties",
            properties.len()
        );
    }
    Ok((number - 1, properties[number - 1].clone()))
}

async fn run(matches: ArgMatches, cfg: Config) -> Result<()> {
    match matches.subcommand() {
        Some(("config", _)) => {
            let path = confy::get_configuration_file_path("propfolio", "config")?;
            println!("Your config file is located here: \n{}", path.display());
        }
        Some(("properties", m)) => {
            let properties = load_properties(m, &cfg).await?;
            if properties.is_empty() {
                println!("No properties yet. Add one with `propfolio add`.");
            } else {
                println!("{}", report::properties_table(&properties));
            }
        }
        Some(("summary", m)) => {
            let properties = load_properties(m, &cfg).await?;
            println!("{}", report::summary_sentence(&summarize(&properties)));
        }
        Some(("growth", m)) => {
            let properties = load_properties(m, &cfg).await?;
            let index = m.get_one::<String>("INDEX").map(String::as_str).unwrap_or("1");
            let (i, property) = select_property(&properties, index)?;
            let window: GrowthWindow = m
                .get_one::<String>("window")
                .map(String::as_str)
                .unwrap_or("5")
                .parse()
                .map_err(|e: String| eyre!(e))?;
            println!("{}", report::property_detail(i, &property, GrowthView::new(window)));
        }
        Some(("chart", m)) => {
            let portfolio = load_portfolio(m, &cfg).await?;
            println!("Portfolio value: {}", format_currency(portfolio.total_value).bold());
            let series = ChartSeries::from_trend(&portfolio.price_trend);
            if series.is_empty() {
                println!("No price trend data available yet.");
            } else {
                println!("{}\n{}", series.label, report::chart_table(&series));
            }
        }
        Some(("add", m)) => {
            let get = |name: &str| m.get_one::<String>(name).map(String::as_str).unwrap_or("");
            let size: f64 = get("size")
                .trim()
                .parse()
                .wrap_err_with(|| format!("Size must be a number, got {}", get("size")))?;
            let new_property =
                NewProperty::parse(size, get("area-type"), get("land-type"), get("lat"), get("lng"))?;
            cfg.api()?
                .add_property(&cfg.session()?, &new_property)
                .await?;
            println!("{}", "Property added successfully!".green());
        }
        _ => {
            cli().print_help()?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg: Config = confy::load("propfolio", "config")
        .wrap_err("could not load config")?;
    let cfg = cfg.with_env_overrides();

    let matches = cli().get_matches();
    if let Err(e) = run(matches, cfg).await {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_cli() {
        let matches = cli().get_matches_from(vec!["propfolio", "summary", "example_data.json"]);
        assert_eq!(matches.subcommand_name(), Some("summary"));

        let matches =
            cli().get_matches_from(vec!["propfolio", "growth", "2", "example_data.json", "-w", "3"]);
        let (_, m) = matches.subcommand().unwrap();
        assert_eq!(m.get_one::<String>("INDEX").unwrap(), "2");
        assert_eq!(m.get_one::<String>("window").unwrap(), "3");

        let matches = cli().get_matches_from(vec![
            "propfolio", "add", "--size", "1000", "--area-type", "urban", "--land-type",
            "residential", "--lat", "-12.5", "--lng", "77.2",
        ]);
        let (_, m) = matches.subcommand().unwrap();
        assert_eq!(m.get_one::<String>("lat").unwrap(), "-12.5");
    }

    #[test]
    fn test_config_session_requires_credentials() {
        assert!(test_config().session().is_err());
        let cfg = Config {
            token: "tok".to_string(),
            user_id: "u1".to_string(),
            ..test_config()
        };
        assert_eq!(cfg.session().unwrap().user_id(), "u1");
    }

    #[tokio::test]
    async fn test_load_properties_from_file() {
        let matches = cli().get_matches_from(vec!["propfolio", "properties", "example_data.json"]);
        let (_, m) = matches.subcommand().unwrap();
        let properties = load_properties(m, &test_config()).await.unwrap();
        assert!(!properties.is_empty());

        let summary = summarize(&properties);
        assert!(summary.total_value > 0.0);
    }

    #[tokio::test]
    async fn test_load_portfolio_from_file_is_derived() {
        let matches = cli().get_matches_from(vec!["propfolio", "chart", "example_data.json"]);
        let (_, m) = matches.subcommand().unwrap();
        let portfolio = load_portfolio(m, &test_config()).await.unwrap();
        assert!(portfolio.price_trend.windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn test_select_property() {
        let properties = read_properties_file("example_data.json").unwrap();
        assert_eq!(select_property(&properties, "1").unwrap().0, 0);
        assert!(select_property(&properties, "0").is_err());
        assert!(select_property(&properties, "x").is_err());
        assert!(select_property(&properties, &(properties.len() + 1).to_string()).is_err());
    }
}
