//! Interactive browsing loop over the search state controller.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::api::{HttpFetcher, Recipe, RecipeFetcher};
use crate::controller::BrowseController;

pub async fn browse(server: &str) -> Result<()> {
    let fetcher: Arc<dyn RecipeFetcher> = Arc::new(HttpFetcher::new(server));
    let mut controller = BrowseController::new(Arc::clone(&fetcher));

    controller.refresh().await;
    render(&controller);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "help" | "?" => {
                print_help();
                continue;
            }
            "n" | "next" => controller.next_page().await,
            "p" | "prev" => controller.prev_page().await,
            "title" => controller.set_title(arg).await,
            "cuisine" => controller.set_cuisine(arg).await,
            "serves" => controller.set_serves(arg).await,
            "rating" => match parse_optional(arg) {
                Ok(rating) => controller.set_rating(rating).await,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            },
            "time" => match parse_optional(arg) {
                Ok(max_time) => controller.set_max_time(max_time).await,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            },
            "limit" => match arg.parse::<i64>() {
                Ok(limit) if limit > 0 => controller.set_limit(limit).await,
                _ => {
                    println!("limit must be a positive integer");
                    continue;
                }
            },
            "clear" => controller.clear_filters().await,
            "show" => match arg.parse::<i32>() {
                Ok(id) => {
                    show_recipe(fetcher.as_ref(), id).await;
                    continue;
                }
                Err(_) => {
                    println!("usage: show <id>");
                    continue;
                }
            },
            other => {
                println!("unknown command {other:?} (try: help)");
                continue;
            }
        }

        render(&controller);
    }

    Ok(())
}

fn parse_optional<T: std::str::FromStr>(arg: &str) -> Result<Option<T>, String> {
    if arg.is_empty() || arg == "clear" {
        Ok(None)
    } else {
        arg.parse::<T>()
            .map(Some)
            .map_err(|_| format!("expected a number or \"clear\", got {arg:?}"))
    }
}

fn print_help() {
    println!("commands:");
    println!("  title <text>     filter by title substring");
    println!("  cuisine <text>   filter by cuisine substring");
    println!("  serves <n>       filter by serving count prefix");
    println!("  rating <1-5>     at most N stars (rating clear to unset)");
    println!("  time <minutes>   at most N minutes total (time clear to unset)");
    println!("  limit <n>        rows per page");
    println!("  n / p            next / previous page");
    println!("  show <id>        recipe details");
    println!("  clear            reset all filters");
    println!("  q                quit");
}

pub fn render(controller: &BrowseController) {
    if controller.loading() {
        println!("Loading…");
        return;
    }

    if let Some(error) = controller.last_error() {
        println!("fetch failed: {error}");
    }

    if controller.recipes().is_empty() {
        println!("No recipes found matching your criteria. (clear resets filters)");
        return;
    }

    print_table(controller.recipes());

    let (start, end) = controller.result_range();
    println!(
        "Showing {} to {} of {} results, page {} of {} ({} per page)",
        start,
        end,
        controller.total(),
        controller.page(),
        controller.total_pages().max(1),
        controller.limit()
    );
}

pub fn print_table(recipes: &[Recipe]) {
    println!(
        "{:>6}  {:<42}  {:<22}  {:>6}  {:>8}  {:<12}",
        "ID", "TITLE", "CUISINE", "RATING", "TIME", "SERVES"
    );
    for recipe in recipes {
        println!(
            "{:>6}  {:<42}  {:<22}  {:>6}  {:>8}  {:<12}",
            recipe.id,
            truncate(&recipe.title, 42),
            truncate(&recipe.cuisine, 22),
            recipe
                .rating
                .map(|r| format!("{r:.1}"))
                .unwrap_or_else(|| "-".to_string()),
            recipe
                .total_time
                .map(|t| format!("{t:.0} min"))
                .unwrap_or_else(|| "-".to_string()),
            truncate(&recipe.serves, 12),
        );
    }
}

pub async fn show_recipe(fetcher: &dyn RecipeFetcher, id: i32) {
    match fetcher.fetch_recipe(id).await {
        Ok(Some(recipe)) => print_detail(&recipe),
        Ok(None) => println!("Recipe {id} not found."),
        Err(e) => println!("fetch failed: {e}"),
    }
}

fn print_detail(recipe: &Recipe) {
    println!("{} (#{})", recipe.title, recipe.id);
    println!("Cuisine: {}", recipe.cuisine);
    if let Some(rating) = recipe.rating {
        println!("Rating: {rating:.1}");
    }
    if !recipe.serves.is_empty() {
        println!("Serves: {}", recipe.serves);
    }
    for (label, minutes) in [
        ("Prep", recipe.prep_time),
        ("Cook", recipe.cook_time),
        ("Total", recipe.total_time),
    ] {
        if let Some(minutes) = minutes {
            println!("{label} time: {minutes:.0} min");
        }
    }
    if let Some(calories) = recipe.nutrients.get("calories") {
        println!("Calories: {calories}");
    }
    match (&recipe.continent, &recipe.country_state) {
        (Some(continent), Some(region)) => println!("Region: {region}, {continent}"),
        (Some(continent), None) => println!("Region: {continent}"),
        (None, Some(region)) => println!("Region: {region}"),
        (None, None) => {}
    }
    if !recipe.description.is_empty() {
        println!("\n{}", recipe.description);
    }
    if !recipe.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &recipe.ingredients {
            println!("  - {ingredient}");
        }
    }
    if !recipe.instructions.is_empty() {
        println!("\nInstructions:");
        for (i, step) in recipe.instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
    if let Some(url) = &recipe.url_link {
        println!("\nSource: {url}");
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
