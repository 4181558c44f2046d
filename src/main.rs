use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::watch;

use movie_shelf::catalog::{GenreId, MovieId, TmdbClient};
use movie_shelf::config::Config;
use movie_shelf::logging::init_tracing;
use movie_shelf::paging::LoadState;
use movie_shelf::ui::list::{ListIntent, ListScreen, ListViewModel, ListViewState};
use movie_shelf::ui::mvi::Resource;

/// Browse top rated movies from the command line.
#[derive(Parser, Debug)]
#[command(name = "movie-shelf", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Expand the movie with this id and load its details (repeatable)
    #[arg(long = "expand", value_name = "ID")]
    expand: Vec<MovieId>,

    /// Select the genre with this id
    #[arg(long, value_name = "ID")]
    genre: Option<GenreId>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let catalog = TmdbClient::new(&config.catalog).context("Failed to create catalog client")?;
    let wait = Duration::from_secs(u64::from(config.catalog.timeout_seconds) + 1);

    let vm = ListScreen::view_model(Arc::new(catalog), &config);
    vm.on_start();
    let mut views = vm.view_states();

    settle(&mut views, wait, |view| !view.refresh.is_loading()).await?;
    if let LoadState::Error(message) = &view_of(&views).refresh {
        bail!("Failed to load movies: {message}");
    }

    while should_load_more(&view_of(&views), cli.pages) {
        let loaded = view_of(&views).loaded_pages;
        vm.on_intent(ListIntent::LoadMore);
        settle(&mut views, wait, |view| {
            view.loaded_pages > loaded || view.append.is_end() || view.append.is_error()
        })
        .await?;
    }

    if let Some(genre_id) = cli.genre {
        settle(&mut views, wait, |view| {
            view.genres_loaded || view.common.error_alert.is_some()
        })
        .await?;
        if select_genre(&vm, genre_id) {
            settle(&mut views, wait, |view| {
                view.selected_genre.as_ref().map(|genre| genre.id) == Some(genre_id)
            })
            .await?;
        }
    }

    for id in &cli.expand {
        expand_movie(&vm, *id);
    }
    if !cli.expand.is_empty() {
        let ids = cli.expand.clone();
        settle(&mut views, wait, move |view| {
            ids.iter().all(|id| {
                view.movies
                    .iter()
                    .find(|item| item.movie.id == *id)
                    .map_or(true, |item| {
                        item.expanded && !item.details.as_ref().is_some_and(Resource::is_loading)
                    })
            })
        })
        .await?;
    }

    print!("{}", render(&vm.view_state()));

    vm.on_stop();
    vm.clear();
    Ok(())
}

fn view_of(views: &watch::Receiver<ListViewState>) -> ListViewState {
    views.borrow().clone()
}

fn should_load_more(view: &ListViewState, pages: usize) -> bool {
    view.loaded_pages < pages && !view.append.is_end() && !view.append.is_error()
}

async fn settle(
    views: &mut watch::Receiver<ListViewState>,
    wait: Duration,
    done: impl FnMut(&ListViewState) -> bool,
) -> Result<()> {
    tokio::time::timeout(wait, views.wait_for(done))
        .await
        .context("Timed out waiting for the catalog")?
        .context("View state channel closed")?;
    Ok(())
}

fn select_genre(vm: &ListViewModel, genre_id: GenreId) -> bool {
    let genre = vm
        .model_state()
        .genres
        .and_then(|genres| genres.get(&genre_id).cloned());
    match genre {
        Some(genre) => vm.on_intent(ListIntent::GenreClicked(genre)).is_some(),
        None => {
            eprintln!("Unknown genre id {genre_id}");
            false
        }
    }
}

fn expand_movie(vm: &ListViewModel, id: MovieId) {
    let movie = vm
        .model_state()
        .paging
        .items
        .into_iter()
        .find(|movie| movie.id == id);
    match movie {
        Some(movie) => {
            vm.on_intent(ListIntent::MovieClicked(movie));
        }
        None => eprintln!("Movie {id} is not among the loaded movies"),
    }
}

fn render(view: &ListViewState) -> String {
    let mut out = String::new();
    if let Some(top_bar) = &view.common.top_bar {
        out.push_str(&format!("== {} ==\n", top_bar.title));
    }
    if view.is_waiting_for_first_page() {
        out.push_str("Waiting for items to load from the backend\n");
    }

    for item in &view.movies {
        let marker = if item.highlighted { '*' } else { ' ' };
        out.push_str(&format!(
            "{} [{}] {} ({:.2})\n",
            marker, item.movie.id, item.movie.title, item.movie.rating
        ));
        if !item.expanded {
            continue;
        }
        match &item.details {
            Some(Resource::Loaded(details)) => {
                if let Some(company) = &details.production_company {
                    out.push_str(&format!("    Production Company: {}\n", company.name));
                }
                if let Some(director) = &details.director {
                    out.push_str(&format!("    Director: {}\n", director.name));
                }
                if !details.actors.is_empty() {
                    let names: Vec<&str> =
                        details.actors.iter().map(|a| a.name.as_str()).collect();
                    out.push_str(&format!("    Cast: {}\n", names.join(", ")));
                }
            }
            Some(Resource::Error) => out.push_str("    Couldn't load movie details\n"),
            Some(Resource::Loading) | None => out.push_str("    Loading details...\n"),
        }
    }

    if matches!(view.append, LoadState::Error(_)) {
        out.push_str("-- failed to load more movies --\n");
    }

    if !view.genre_chips.is_empty() {
        let chips: Vec<String> = view
            .genre_chips
            .iter()
            .map(|chip| {
                let mark = if chip.selected { "[x]" } else { "[ ]" };
                format!("{} {} {}", mark, chip.genre.name, chip.count)
            })
            .collect();
        out.push_str(&format!("Genres: {}\n", chips.join("  ")));
    }

    if let Some(alert) = view.common.visible_alert() {
        out.push_str(&format!("! {}\n", alert));
    }
    out
}
