use crate::corpus::Corpus;
use crate::models::Language;
use crate::storage::{keys, PreferenceStore};
use anyhow::Result;
use crossterm::terminal as term;

/// One visited quote as stored, resolved against the current corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitRow {
    pub position: usize,
    pub current: bool,
    pub code: String,
    pub credit: Option<String>,
    pub text: Option<String>,
}

pub fn visit_rows<S: PreferenceStore>(store: &S, corpus: &Corpus, lang: Language) -> Vec<VisitRow> {
    let history: Vec<String> = store.get_json(keys::HISTORY).unwrap_or_default();
    let ptr: i64 = store
        .get(keys::POINTER)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(-1);

    history
        .into_iter()
        .enumerate()
        .map(|(i, code)| {
            let quote = corpus.index_of(&code).and_then(|idx| corpus.get(idx));
            VisitRow {
                position: i + 1,
                current: i as i64 == ptr,
                credit: quote.map(|q| q.credit.clone()),
                text: quote.map(|q| q.text(lang).to_string()),
                code,
            }
        })
        .collect()
}

pub fn show_history<S: PreferenceStore>(store: &S, corpus: &Corpus, lang: Language) -> Result<()> {
    let rows = visit_rows(store, corpus, lang);

    if rows.is_empty() {
        println!("\n  No history yet. Open a few quotes to start browsing back and forth.\n");
        return Ok(());
    }

    let term_width = term::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
        .max(40);

    const W_NUM:    usize = 5;
    const W_CODE:   usize = 10;
    const W_CREDIT: usize = 22;

    let show_credit = term_width >= 1 + 2 + W_NUM + W_CODE + W_CREDIT + 20;
    let fixed = 1 + 2 + W_NUM + W_CODE + if show_credit { W_CREDIT } else { 0 };
    let text_width = term_width.saturating_sub(fixed).max(10);
    let divider = "-".repeat(term_width.saturating_sub(1));

    let unknown = rows.iter().filter(|r| r.text.is_none()).count();
    let mut codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
    codes.sort_unstable();
    codes.dedup();

    println!();
    println!(
        "  {} visits  |  {} distinct  |  {} no longer in the collection",
        rows.len(),
        codes.len(),
        unknown
    );
    println!();

    print!(" {:<2}{:<nw$}{:<cw$}", "", "#", "code", nw = W_NUM, cw = W_CODE);
    if show_credit { print!("{:<rw$}", "credit", rw = W_CREDIT); }
    println!("quote");
    println!(" {}", divider);

    for r in &rows {
        let marker = if r.current { ">" } else { "" };
        let credit = r.credit.as_deref().unwrap_or("-");
        let text = r.text.as_deref().unwrap_or("(missing)");

        print!(" {:<2}{:<nw$}{:<cw$}", marker, r.position, truncate(&r.code, W_CODE - 1), nw = W_NUM, cw = W_CODE);
        if show_credit { print!("{:<rw$}", truncate(credit, W_CREDIT - 1), rw = W_CREDIT); }
        println!("{}", truncate(text, text_width));
    }

    println!(" {}", divider);
    println!();

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
