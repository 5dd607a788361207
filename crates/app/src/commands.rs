use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use anyhow::{Context, bail};
use learn_core::model::Difficulty;
use learn_core::progress::ScoreBand;
use services::{
    AdvanceOutcome, AppServices, Clock, FlashcardState, ProgressLedger, QuizError, SummaryService,
};

use crate::db;

const BAR_WIDTH: u32 = 20;
/// Quizzes listed by `progress`, newest first.
const HISTORY_LIMIT: usize = 10;

pub async fn connect(raw_db_url: &str) -> anyhow::Result<AppServices> {
    let db_url = db::normalize_sqlite_url(raw_db_url);
    db::prepare_sqlite_file(&db_url)?;
    tracing::debug!(db_url = %db_url, "opening database");
    AppServices::new_sqlite(&db_url, Clock::system())
        .await
        .with_context(|| format!("opening {db_url}"))
}

pub async fn dashboard(services: &AppServices) -> anyhow::Result<()> {
    let dashboard = services.dashboard().load().await;

    println!("\"{}\"\n", dashboard.quote);
    println!(
        "Topics learned: {}   Quizzes completed: {}   Average score: {}%",
        dashboard.stats.topics_learned,
        dashboard.stats.quizzes_completed,
        dashboard.stats.average_score_percent
    );

    if !dashboard.chart.is_empty() {
        println!("\nRecent quiz performance");
        for point in &dashboard.chart {
            println!("  {:<18} {} {}%", point.label, bar(point.percent), point.percent);
        }
    }

    println!("\nRecently learned");
    if dashboard.recent_topics.is_empty() {
        println!("  nothing yet, try `learn explain <topic>`");
    }
    for topic in &dashboard.recent_topics {
        println!("  - {topic}");
    }

    println!("\nRecent quizzes");
    if dashboard.recent_quizzes.is_empty() {
        println!("  nothing yet, try `learn quiz <topic>`");
    }
    for result in &dashboard.recent_quizzes {
        println!(
            "  - {}: {}/{} ({}%)",
            result.topic(),
            result.score(),
            result.total(),
            result.percent()
        );
    }
    Ok(())
}

pub fn progress(services: &AppServices) {
    let ledger = services.ledger();
    let stats = ledger.stats();
    let snapshot = ledger.snapshot();

    println!(
        "Topics learned: {}   Quizzes completed: {}   Average score: {}%",
        stats.topics_learned, stats.quizzes_completed, stats.average_score_percent
    );

    println!("\nTopics");
    for topic in snapshot.topics() {
        println!("  - {topic}");
    }

    println!("\nQuiz history");
    for line in history_lines(&ledger) {
        println!("  {line}");
    }
}

fn history_lines(ledger: &ProgressLedger) -> Vec<String> {
    ledger
        .quiz_history(HISTORY_LIMIT)
        .into_iter()
        .map(|entry| {
            format!(
                "{}  {:<30} {}/{}  {:>3}%  {}",
                entry.result.date().format("%Y-%m-%d"),
                entry.result.topic(),
                entry.result.score(),
                entry.result.total(),
                entry.percent,
                band_label(entry.band)
            )
        })
        .collect()
}

pub async fn explain(
    services: &AppServices,
    topic: &str,
    difficulty: Difficulty,
) -> anyhow::Result<()> {
    let explanation = services.explain().explain(topic, difficulty).await?;
    println!(
        "{} ({})\n\n{}",
        explanation.topic,
        explanation.difficulty.label(),
        explanation.text
    );
    Ok(())
}

pub async fn quiz(services: &AppServices, topic: &str) -> anyhow::Result<()> {
    let mut session = services.quiz_session();
    println!("Generating quiz on {}...", topic.trim());
    session.start(topic).await?;

    let mut input = io::stdin().lock().lines();
    loop {
        let (Some(question), Some((number, total))) =
            (session.current_question(), session.question_number())
        else {
            bail!("quiz is not in progress");
        };
        println!("\nQuestion {number} of {total}: {}", question.prompt());
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let Some(choice) = prompt_line(&mut input, "Your answer: ")? else {
            bail!("quiz abandoned");
        };
        let Ok(choice) = choice.trim().parse::<usize>() else {
            println!("Enter the number of an option.");
            continue;
        };
        match session.select(choice.wrapping_sub(1)) {
            Ok(()) => {}
            Err(QuizError::OptionOutOfRange { len, .. }) => {
                println!("Pick a number between 1 and {len}.");
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        if let AdvanceOutcome::Finished(result) = session.advance().await? {
            println!(
                "\nQuiz complete: {}/{} ({}%)",
                result.score(),
                result.total(),
                result.percent()
            );
            return Ok(());
        }
    }
}

pub async fn flashcards(services: &AppServices, topic: &str) -> anyhow::Result<()> {
    let mut session = services.flashcard_session();
    println!("Generating flashcards on {}...", topic.trim());
    let count = session.start(topic).await?;
    println!("{count} cards. Commands: [f]lip, [n]ext, [p]revious, [q]uit");

    let mut input = io::stdin().lock().lines();
    loop {
        let FlashcardState::Studying(deck) = session.state() else {
            return Ok(());
        };
        let (position, total) = deck.position();
        let side = if deck.is_flipped() { "back" } else { "front" };
        println!("\n[{position}/{total}] ({side}) {}", deck.visible_side());

        let Some(command) = prompt_line(&mut input, "> ")? else {
            return Ok(());
        };
        match command.trim() {
            "f" | "flip" | "" => session.flip()?,
            "n" | "next" => session.next()?,
            "p" | "prev" | "previous" => session.previous()?,
            "q" | "quit" => session.new_deck()?,
            other => println!("unknown command: {other}"),
        }
    }
}

pub async fn summarize(
    services: &AppServices,
    file: Option<&Path>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("reading stdin")?;
            text
        }
    };

    let summary = services.summary().summarize(&text).await?;
    println!("{summary}");

    if let Some(path) = out {
        SummaryService::save_summary(path, &summary)?;
        eprintln!("saved to {}", path.display());
    }
    Ok(())
}

fn prompt_line(
    input: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    Ok(input.next().transpose()?)
}

fn bar(percent: u32) -> String {
    let filled = (percent.min(100) * BAR_WIDTH / 100) as usize;
    format!(
        "{}{}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH as usize - filled)
    )
}

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Strong => "strong",
        ScoreBand::Fair => "fair",
        ScoreBand::Weak => "needs work",
    }
}
