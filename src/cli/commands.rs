use crate::app::{AppContext, Result};
use crate::domain::ArticleRecord;
use crate::feed::StreamKind;

pub async fn feed(ctx: &AppContext, batches: u32) -> Result<()> {
    for _ in 0..batches {
        if !ctx.engine.load_more().await {
            println!("Batch failed, see logs");
        }
    }

    print_cards(&ctx.store.records(StreamKind::Main));
    Ok(())
}

pub async fn search(ctx: &AppContext, term: &str) -> Result<()> {
    if !ctx.engine.search(term).await {
        println!("No results for '{}'", term.trim());
        return Ok(());
    }

    print_cards(&ctx.store.records(StreamKind::Search));
    Ok(())
}

pub async fn related(ctx: &AppContext, page_id: i64) -> Result<()> {
    if !ctx.engine.load_related(page_id).await {
        println!("No related articles for page {}", page_id);
        return Ok(());
    }

    print_cards(&ctx.store.records(StreamKind::Related));
    Ok(())
}

fn print_cards(records: &[ArticleRecord]) {
    if records.is_empty() {
        println!("No cards");
        return;
    }

    for record in records {
        println!("#{} {}", record.page_id, record.display_title());
        if !record.extract.is_empty() {
            println!("  {}", record.extract);
        }
        if let Some(thumbnail) = &record.thumbnail {
            println!("  [{}x{}] {}", thumbnail.width, thumbnail.height, thumbnail.source);
        }
    }
    println!("{} cards", records.len());
}
