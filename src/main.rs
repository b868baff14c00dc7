mod args;
mod sociogram;

use clap::Parser;
use log::{debug, LevelFilter};
use snafu::{whatever, ErrorCompat};
use survey_tally::Choice;

use crate::args::Args;
use crate::sociogram::chart::TextChartSurface;
use crate::sociogram::render::{render_menus, render_status};
use crate::sociogram::view::{build_menus, Screen, ViewAction, ViewState};
use crate::sociogram::*;

const CHART_WIDTH: usize = 40;

fn print_screen(screen: &Screen, view: &ViewState<TextChartSurface>) {
    println!("\n{}", screen.title);
    if screen.chart {
        print!("{}", view.surface().canvas());
    }
    print!("{}", screen.text);
}

fn run(args: &Args) -> SgResult<()> {
    let config = resolve_config(
        args.config.as_deref(),
        args.roster.as_deref(),
        args.roster_type.as_deref(),
        args.input.as_deref(),
    )?;
    let store = load_survey(&config)?;
    println!("{}", render_status(&store));

    let mut view = ViewState::new(TextChartSurface::new(CHART_WIDTH));
    let mut shown = false;

    if let Some(name) = &args.student {
        let screen = view.perform(&store, &ViewAction::ShowStudent(name.clone()))?;
        print_screen(&screen, &view);
        shown = true;
    }

    match (&args.question, &args.option, args.bar) {
        (Some(key), option, bar) => {
            let screen = view.perform(&store, &ViewAction::ShowQuestion(key.clone()))?;
            print_screen(&screen, &view);
            shown = true;
            if let Some(value) = option {
                let action = ViewAction::ShowVoters {
                    question: key.clone(),
                    choice: Choice::from_label(value),
                };
                let screen = view.perform(&store, &action)?;
                print_screen(&screen, &view);
            }
            if let Some(index) = bar {
                let action = view
                    .click_bar(index)
                    .ok_or(SociogramError::UnknownBar { index })?;
                let screen = view.perform(&store, &action)?;
                print_screen(&screen, &view);
            }
        }
        (None, Some(_), _) | (None, _, Some(_)) => {
            whatever!("--option and --bar require --question")
        }
        (None, None, None) => {}
    }

    if args.list || !shown {
        print!("{}", render_menus(&build_menus(&store)));
    }

    let out = summary_destination(args.out.as_deref(), &config);
    if out.is_some() || args.reference.is_some() {
        let summary = build_summary_js(&config, &store);
        if let Some(p) = &out {
            write_summary(&summary, p)?;
        }
        if let Some(p) = &args.reference {
            check_reference(&summary, p)?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
