// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::result::Result as StdResult;

use pico_args::Arguments;
use serde::Serialize;

use glimpse_engine::{Dashboard, Dataset, DatasetMap, WidgetResult, json};

const VERSION: &str = "1.0";
const EXIT_FAILURE: i32 = 1;

macro_rules! die(
    ($($arg:tt)*) => { {
        eprintln!($($arg)*);
        std::process::exit(EXIT_FAILURE)
    } }
);

fn usage() -> ! {
    let argv0 = std::env::args()
        .next()
        .unwrap_or_else(|| "glimpse".to_string());
    die!(
        concat!(
            "glimpse {}: Interpret declarative dashboard specs.\n\
         \n\
         USAGE:\n",
            "    {} [SUBCOMMAND] [OPTION...] SPEC_PATH\n",
            "\n\
         OPTIONS:\n",
            "    -h, --help       show this message\n",
            "    --dataset FILE   dataset to interpret (.csv or JSON array of objects)\n",
            "    --tab N          interpret the given tab (default 0)\n",
            "    --output FILE    path to write output file (default stdout)\n",
            "    --compact        emit compact JSON instead of pretty-printed\n",
            "\n\
         SUBCOMMANDS:\n",
            "    interpret        Compute per-widget results and the effective layout\n",
            "    layout           Print the effective layout only\n",
            "    validate         Parse a spec and report what it contains\n",
        ),
        VERSION,
        argv0
    );
}

#[derive(Clone, Default, Debug)]
struct Args {
    path: Option<String>,
    dataset: Option<String>,
    output: Option<String>,
    tab: usize,
    is_compact: bool,
    is_layout: bool,
    is_validate: bool,
}

fn parse_args() -> StdResult<Args, Box<dyn std::error::Error>> {
    let mut parsed = Arguments::from_env();
    if parsed.contains(["-h", "--help"]) {
        usage();
    }

    let subcommand = parsed.subcommand()?;
    if subcommand.is_none() {
        eprintln!("error: subcommand required");
        usage();
    }

    let mut args: Args = Default::default();

    let subcommand = subcommand.unwrap();
    if subcommand == "interpret" {
    } else if subcommand == "layout" {
        args.is_layout = true;
    } else if subcommand == "validate" {
        args.is_validate = true;
    } else {
        eprintln!("error: unknown subcommand {}", subcommand);
        usage();
    }

    args.dataset = parsed.value_from_str("--dataset").ok();
    args.output = parsed.value_from_str("--output").ok();
    args.tab = parsed.value_from_str("--tab").unwrap_or(0);
    args.is_compact = parsed.contains("--compact");

    let free_arguments = parsed.finish();
    if free_arguments.is_empty() {
        eprintln!("error: spec path required");
        usage();
    }

    args.path = free_arguments[0].to_str().map(|s| s.to_owned());

    Ok(args)
}

fn load_spec(path: &str) -> glimpse_engine::DashboardSpec {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|err| die!("error: couldn't open {}: {}", path, err));
    json::dashboard_from_str(&contents).unwrap_or_else(|err| die!("error: {}: {}", path, err))
}

fn load_datasets(path: Option<&str>) -> DatasetMap {
    let mut datasets = DatasetMap::new();
    let Some(path) = path else {
        return datasets;
    };

    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|err| die!("error: couldn't open {}: {}", path, err));
    let dataset = if path.ends_with(".csv") {
        Dataset::from_csv(contents.as_bytes())
    } else {
        Dataset::from_json_str(&contents)
    };
    let dataset = dataset.unwrap_or_else(|err| die!("error: {}: {}", path, err));

    let name = path.rsplit('/').next().unwrap_or(path);
    let name = name.strip_suffix(".csv").or_else(|| name.strip_suffix(".json")).unwrap_or(name);
    datasets.insert(name, dataset);
    datasets
}

#[derive(Serialize)]
struct InterpretOutput {
    results: HashMap<String, WidgetResult>,
    layout: Vec<json::LayoutItem>,
}

#[derive(Serialize)]
struct LayoutOutput {
    layout: Vec<json::LayoutItem>,
}

#[derive(Serialize)]
struct ValidateOutput {
    filters: usize,
    kpis: usize,
    charts: usize,
    tabs: usize,
    has_supplied_layout: bool,
}

fn emit<T: Serialize>(value: &T, args: &Args) {
    let rendered = if args.is_compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    let rendered = rendered.unwrap_or_else(|err| die!("error: serializing output: {}", err));

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .unwrap_or_else(|err| die!("error: couldn't create {}: {}", path, err));
            writeln!(file, "{}", rendered)
                .unwrap_or_else(|err| die!("error: writing {}: {}", path, err));
        }
        None => println!("{}", rendered),
    }
}

fn main() {
    let args = parse_args().unwrap_or_else(|err| die!("error: {}", err));
    let path = args.path.clone().unwrap_or_else(|| usage());

    let spec = load_spec(&path);

    if args.is_validate {
        emit(
            &ValidateOutput {
                filters: spec.filters.len(),
                kpis: spec.kpis.len(),
                charts: spec.charts.len(),
                tabs: spec.tabs.len(),
                has_supplied_layout: spec.layout.is_some(),
            },
            &args,
        );
        return;
    }

    let mut dashboard = Dashboard::new(spec);
    if !dashboard.set_active_tab(args.tab) {
        die!("error: {} has no tab {}", path, args.tab);
    }

    let datasets = load_datasets(args.dataset.as_deref());
    let pass = dashboard.interpret(&datasets);
    let layout: Vec<json::LayoutItem> = pass.layout.iter().map(Into::into).collect();

    if args.is_layout {
        emit(&LayoutOutput { layout }, &args);
    } else {
        emit(
            &InterpretOutput {
                results: pass.results,
                layout,
            },
            &args,
        );
    }
}
