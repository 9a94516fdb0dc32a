// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SkyFare contributors

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use skyfare_core::client::{SearchClient, SuggestionFeed};
use skyfare_core::config::Config;
use skyfare_core::flow::{ResultsStage, ReturnStage, SearchForm, StageHandoff, TripType};
use skyfare_core::offers::{FlightOffer, OfferSummary};
use skyfare_core::sorter::SortKey;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search service endpoint (overrides the config file)
    #[arg(long, env = "SKYFARE_ENDPOINT")]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search flights and walk through outbound/return selection
    Search(SearchArgs),
    /// Look up airport codes by keyword
    Airports { keyword: String },
    /// Show or set the search service endpoint
    Config {
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Origin airport code or free text
    #[arg(long)]
    from: Option<String>,
    /// Destination airport code or free text
    #[arg(long)]
    to: Option<String>,
    /// Departure date, YYYY-MM-DD
    #[arg(long)]
    depart: Option<String>,
    /// Return date, YYYY-MM-DD (implies a round trip)
    #[arg(long = "return")]
    return_date: Option<String>,
    /// Book a round trip
    #[arg(long)]
    round_trip: bool,
    /// Number of passengers (1-6)
    #[arg(long, default_value_t = 1)]
    passengers: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let mut config = Config::load();
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }

    match cli.command {
        Commands::Airports { keyword } => {
            let client = SearchClient::new(&config.endpoint)?;
            let airports = client.suggest_airports(&keyword);
            if airports.is_empty() {
                println!("No suggestions for '{}'.", keyword);
            } else {
                for airport in airports {
                    println!("{}  {}", airport.iata_code, airport.name);
                }
            }
            Ok(())
        }
        Commands::Config { endpoint } => {
            match endpoint {
                Some(endpoint) => {
                    config.endpoint = endpoint;
                    config.save()?;
                    println!("Endpoint set to {}", config.endpoint);
                }
                None => println!("Endpoint: {}", config.endpoint),
            }
            Ok(())
        }
        Commands::Search(args) => run_search(&config, args),
    }
}

fn run_search(config: &Config, args: SearchArgs) -> Result<()> {
    let client = SearchClient::new(&config.endpoint)?;
    let mut feed = SuggestionFeed::new();

    let mut form = SearchForm::default();
    form.trip_type = if args.round_trip || args.return_date.is_some() {
        TripType::RoundTrip
    } else {
        TripType::OneWay
    };
    form.passenger_count = args.passengers.clamp(1, 6);

    let (origin, origin_display) = resolve_airport(&client, &mut feed, "From", args.from)?;
    form.origin = origin;
    form.origin_display = origin_display;

    let (destination, destination_display) = resolve_airport(&client, &mut feed, "To", args.to)?;
    form.destination = destination;
    form.destination_display = destination_display;

    form.departure_date = read_date("Departure date (YYYY-MM-DD)", args.depart)?;
    if form.trip_type == TripType::RoundTrip {
        form.return_date = read_date("Return date (YYYY-MM-DD)", args.return_date)?;
    }

    // Presence checks happen before any request goes out.
    let params = match form.validate() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };

    let offers = match client.search(&params) {
        Ok(offers) => offers,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };
    if offers.is_empty() {
        println!("No flights found for this route.");
        return Ok(());
    }

    let mut stage = ResultsStage::new(offers, params);
    if !stage.unmatched().is_empty() {
        println!(
            "Note: {} result(s) fell outside the requested dates and were set aside.",
            stage.unmatched().len()
        );
    }

    let title = if stage.is_round_trip() {
        "Select Outbound Flight"
    } else {
        "Flight Results"
    };
    println!(
        "\n{}\n{} -> {} | {}",
        title,
        stage.params().origin,
        stage.params().destination,
        stage.params().departure_date
    );

    let handoff = loop {
        let command = {
            let offers = stage.sorted_offers();
            selection_loop(&offers, stage.sort_key(), stage.selected())?
        };
        match command {
            Command::Quit => return Ok(()),
            Command::Sort(key) => stage.set_sort_key(key),
            Command::Select(index) => {
                if !stage.select(index) {
                    println!("No such flight number in the list.");
                }
            }
            Command::Confirm => match stage.confirm() {
                Ok(handoff) => break handoff,
                Err(e) => println!("{}", e),
            },
        }
    };

    let trip = match handoff {
        StageHandoff::Booking(trip) => trip,
        StageHandoff::Return(handoff) => {
            let mut ret = ReturnStage::new(handoff);
            println!(
                "\nSelect Return Flight\n{} -> {} | {}",
                ret.params().destination,
                ret.params().origin,
                ret.params()
                    .return_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "?".to_string())
            );
            println!("\nYour outbound flight:");
            print_offer(None, ret.outbound(), true);

            loop {
                let command = {
                    let offers = ret.sorted_offers();
                    selection_loop(&offers, ret.sort_key(), ret.selected())?
                };
                match command {
                    Command::Quit => return Ok(()),
                    Command::Sort(key) => ret.set_sort_key(key),
                    Command::Select(index) => {
                        if !ret.select(index) {
                            println!("No such flight number in the list.");
                        }
                    }
                    Command::Confirm => match ret.confirm() {
                        Ok(trip) => break trip,
                        Err(e) => println!("{}", e),
                    },
                }
            }
        }
    };

    println!("\nHanding off to booking:");
    println!("{}", serde_json::to_string_pretty(&trip)?);
    Ok(())
}

enum Command {
    Select(usize),
    Sort(SortKey),
    Confirm,
    Quit,
}

/// Renders the current listing and reads one command.
fn selection_loop(
    offers: &[FlightOffer],
    sort_key: SortKey,
    selected: Option<&FlightOffer>,
) -> Result<Command> {
    if offers.is_empty() {
        println!("No flights found for this route.");
        return Ok(Command::Quit);
    }

    println!(
        "\nFound {} flights (sorted by {})",
        offers.len(),
        sort_key.as_str()
    );
    for (i, offer) in offers.iter().enumerate() {
        print_offer(Some(i + 1), offer, selected == Some(offer));
    }

    loop {
        let input = prompt("[number] select · s price|duration · c confirm · q quit")?;
        let input = input.trim();

        if input.eq_ignore_ascii_case("q") {
            return Ok(Command::Quit);
        }
        if input.eq_ignore_ascii_case("c") {
            return Ok(Command::Confirm);
        }
        if let Some(rest) = input.strip_prefix("s ") {
            match rest.parse::<SortKey>() {
                Ok(key) => return Ok(Command::Sort(key)),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            }
        }
        if let Ok(n) = input.parse::<usize>() {
            if n >= 1 {
                return Ok(Command::Select(n - 1));
            }
        }
        println!("Unrecognized input '{}'.", input);
    }
}

fn print_offer(index: Option<usize>, offer: &FlightOffer, selected: bool) {
    let s = OfferSummary::from_offer(offer);
    let marker = if selected { "*" } else { " " };
    let prefix = match index {
        Some(i) => format!("[{}]", i),
        None => "   ".to_string(),
    };
    println!(
        "{}{} {} {}  {} {} -> {} {}  {}  {}  {} {}",
        marker,
        prefix,
        s.airline,
        s.flight_number,
        s.departure_time,
        s.departure_code,
        s.arrival_time,
        s.arrival_code,
        s.duration,
        s.stops_label(),
        s.currency,
        s.price
    );
}

/// Prompts for an airport (unless preset from a flag) and offers
/// autocomplete candidates. Returns (resolved code, typed display text);
/// the code is empty when the user keeps their free text.
fn resolve_airport(
    client: &SearchClient,
    feed: &mut SuggestionFeed,
    label: &str,
    preset: Option<String>,
) -> Result<(String, String)> {
    let typed = match preset {
        Some(value) => value,
        None => prompt(&format!("{} (city or airport code)", label))?,
    };

    if typed.trim().is_empty() {
        feed.clear();
        return Ok((String::new(), typed));
    }

    let seq = feed.begin_query();
    let suggestions = client.suggest_airports(&typed);
    feed.apply(seq, suggestions);

    if feed.suggestions().is_empty() {
        return Ok((String::new(), typed));
    }

    println!("Airports matching '{}':", typed.trim());
    for (i, airport) in feed.suggestions().iter().enumerate() {
        println!("  [{}] {}  {}", i + 1, airport.iata_code, airport.name);
    }
    let choice = prompt("Pick a number, or press Enter to keep your text")?;
    if let Ok(n) = choice.trim().parse::<usize>() {
        if let Some(airport) = feed.suggestions().get(n.wrapping_sub(1)) {
            return Ok((airport.iata_code.clone(), airport.iata_code.clone()));
        }
    }
    Ok((String::new(), typed))
}

fn read_date(label: &str, preset: Option<String>) -> Result<Option<NaiveDate>> {
    let raw = match preset {
        Some(value) => value,
        None => prompt(label)?,
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            eprintln!("'{}' is not a date (expected YYYY-MM-DD).", raw);
            Ok(None)
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
