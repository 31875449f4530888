use crate::{
    core::{
        catalog::Catalog,
        favorites::{FavoritesChange, FavoritesChangeKind, FavoritesObserver},
        filter::{FacetCategory, FilterState},
        projection::{results_text, summary_text},
    },
    error::CatalogError,
    models::{FavoritesEntry, PlanId},
    session::{PlanCard, Presenter, Signal},
};

/// Presenter that prints results to stdout.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    pub verbose: bool,
}

impl TerminalPresenter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, cards: &[PlanCard<'_>], state: &FilterState) {
        let badges = state.badges();
        if !badges.is_empty() {
            let labels: Vec<&str> = badges.iter().map(|badge| badge.label.as_str()).collect();
            println!("Active filters: {}", labels.join(" | "));
        }
        if let Some(query) = &state.query {
            println!("Search: {:?} ({})", query, results_text(cards.len()));
        }
        println!();
        for card in cards {
            let plan = card.plan;
            let heart = if card.favorited { "♥" } else { " " };
            println!(
                "{} [{}] {} - {} bed, {} bath, {} m² - from ${:.2} ({})",
                heart, plan.id, plan.title, plan.bedrooms, plan.bathrooms, plan.size_sqm, plan.price_from, plan.style
            );
            if self.verbose {
                if let Some(subtitle) = &plan.subtitle {
                    println!("      {}", subtitle);
                }
                if let Some(thumbnail) = plan.thumbnail() {
                    println!("      {}", thumbnail);
                }
            }
        }
    }

    fn render_count(&mut self, count: usize, total: usize) {
        println!("{}", summary_text(count, total));
    }

    fn render_empty_state(&mut self) {
        println!("No houses found. Try adjusting your filters to see more results.");
    }

    fn render_load_error(&mut self, error: &CatalogError) {
        eprintln!("Failed to load projects: {}", error);
    }

    fn sync_address(&mut self, query: &str) {
        if self.verbose && !query.is_empty() {
            println!("Link: ?{}", query);
        }
    }

    fn favorite_toggled(&mut self, id: &PlanId, favorited: bool) {
        let verb = if favorited { "saved" } else { "unsaved" };
        println!("Plan {} {}", id, verb);
    }
}

/// Prints a short notice for each favorites change.
#[derive(Debug, Default)]
pub struct TerminalObserver;

impl FavoritesObserver for TerminalObserver {
    fn favorites_changed(&self, change: &FavoritesChange) {
        match &change.kind {
            FavoritesChangeKind::Added(_) => println!("Added to favorites! ({} saved)", change.count),
            FavoritesChangeKind::Removed(_) => println!("Removed from favorites ({} saved)", change.count),
            FavoritesChangeKind::Cleared => println!("Favorites cleared"),
        }
    }

    fn storage_failed(&self, error: &anyhow::Error) {
        eprintln!("Favorites are unavailable: {:#}", error);
    }
}

/// Print the saved favorites list.
pub fn print_favorites(entries: &[FavoritesEntry]) {
    let plural = if entries.len() == 1 { "" } else { "s" };
    println!("{} saved plan{}", entries.len(), plural);
    for entry in entries {
        println!(
            "  [{}] {} - {} bed, {} bath, {} m² - ${:.2}",
            entry.id, entry.title, entry.bedrooms, entry.bathrooms, entry.size_sqm, entry.price_from
        );
    }
}

/// Parse one line typed in `browse` mode.
///
/// `+style Modern` / `-style Modern` check and uncheck a facet, `x style Modern`
/// removes its badge, `q farm` searches (`q` alone clears the search),
/// `clear` drops every facet and `fav 12` toggles a favorite.
pub fn parse_signal(line: &str, catalog: &Catalog) -> Option<Signal> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head {
        "clear" => Some(Signal::ClearAll),
        "q" => Some(Signal::QueryChanged(rest.to_string())),
        "x" => {
            let (category, value) = facet_args(rest)?;
            Some(Signal::RemoveBadge { category, value })
        }
        "fav" if !rest.is_empty() => {
            let id = match catalog.lookup(rest) {
                Some(plan) => plan.id.clone(),
                None => {
                    let Ok(id) = rest.parse::<PlanId>();
                    id
                }
            };
            Some(Signal::FavoriteToggled(id))
        }
        _ => {
            let (selected, key) = match (head.strip_prefix('+'), head.strip_prefix('-')) {
                (Some(key), _) => (true, key),
                (_, Some(key)) => (false, key),
                _ => return None,
            };
            let category = key.parse().ok()?;
            (!rest.is_empty()).then(|| Signal::FacetChanged {
                category,
                value: rest.to_string(),
                selected,
            })
        }
    }
}

fn facet_args(rest: &str) -> Option<(FacetCategory, String)> {
    let (key, value) = rest.split_once(char::is_whitespace)?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some((key.parse().ok()?, value.to_string()))
}
