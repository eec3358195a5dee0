use clap::Parser;

use voicing_gen::{
    rank, search_by_constraint, search_by_query, SearchOptions, SearchRequest, Tuning,
};

#[derive(Debug, Parser)]
#[command(name = "voicing-gen")]
#[command(about = "Find playable fingerings for a chord name or a set of notes.")]
struct Cli {
    /// Chord name (`G7`), quoted note list (`'G B`) or notes (`G B D`).
    query: Vec<String>,

    /// Notes every voicing must contain, e.g. `--required G B`.
    #[arg(long, num_args = 1.., conflicts_with = "query")]
    required: Vec<String>,

    /// Notes a voicing may contain.
    #[arg(long, num_args = 1.., conflicts_with = "query")]
    optional: Vec<String>,

    /// Open strings, lowest first.
    #[arg(long, default_value = "E2 A2 D3 G3 B3 E4")]
    tuning: String,

    #[arg(long)]
    max_span: Option<u8>,

    #[arg(long)]
    max_fret: Option<u8>,

    #[arg(long)]
    max_fingers: Option<u8>,

    /// Fewest strings a voicing may sound.
    #[arg(long)]
    min_notes: Option<u8>,

    /// Sort from easiest to hardest instead of by position.
    #[arg(long)]
    rank: bool,

    /// Print a JSON array.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn options(&self) -> Result<SearchOptions, String> {
        let defaults = SearchOptions::default();
        let tuning: Tuning = self.tuning.parse().map_err(|e| format!("{e}"))?;
        SearchOptions::builder()
            .tuning(tuning)
            .max_span(self.max_span.unwrap_or(defaults.max_span))
            .max_fret(self.max_fret.unwrap_or(defaults.max_fret))
            .max_fingers(self.max_fingers.unwrap_or(defaults.max_fingers))
            .min_notes(self.min_notes.or(defaults.min_notes))
            .build()
            .map_err(|e| format!("{e}"))
    }
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    let options = cli.options()?;

    let mut results = if cli.required.is_empty() && cli.optional.is_empty() {
        if cli.query.is_empty() {
            return Err("Write a chord name or some notes".to_string());
        }
        search_by_query(&cli.query.join(" "), &options)
    } else {
        let request = SearchRequest {
            required_notes: cli.required.clone(),
            optional_notes: cli.optional.clone(),
            ..Default::default()
        };
        search_by_constraint(&request, &options)
    }
    .map_err(|e| format!("{e}"))?;

    if cli.rank {
        rank(&mut results);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&results).map_err(|e| format!("{e}"))?;
        println!("{json}");
    } else {
        for result in &results {
            println!("{result}");
        }
    }

    Ok(())
}
