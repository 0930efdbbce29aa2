use crate::crawlers::crawler::BrowserSession;
use crate::error::ScrapeError;
use crate::results::Product;
use crate::utils::sanitize_filename;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column headers of the product CSV
pub const CSV_HEADERS: [&str; 5] = [
    "Title",
    "Memory",
    "Price (PLN)",
    "Raw Price",
    "Price per Unit (PLN/GB)",
];

/// Writes ranked products to a CSV file
pub fn write_csv(path: &Path, products: &[Product]) -> Result<(), ScrapeError> {
    let file = File::create(path)?;
    write_products(file, products)?;
    ::log::info!("Wrote {} products to {}", products.len(), path.display());
    Ok(())
}

/// Writes the CSV header and one row per product to any writer
pub fn write_products<W: Write>(out: W, products: &[Product]) -> Result<(), ScrapeError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADERS)?;

    for product in products {
        writer.write_record([
            product.title.clone().unwrap_or_default(),
            product.memory.clone().unwrap_or_default(),
            format_number(product.price_numeric),
            product.raw_price.clone().unwrap_or_default(),
            format_number(product.price_per_unit),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Default decimal form of a number; blank when absent
pub fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Renders the console summary table
pub fn summary_table(products: &[Product]) -> String {
    let headers = ["#", "title", "memory", "price", "pricePerUnit"];
    let rows: Vec<[String; 5]> = products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            [
                i.to_string(),
                p.title.clone().unwrap_or_default(),
                p.memory.clone().unwrap_or_default(),
                format_number(p.price_numeric),
                format_number(p.price_per_unit),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("| {} |", padded.join(" | "))
    };
    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut table = vec![separator.clone(), line(&headers.map(String::from)), separator.clone()];
    table.extend(rows.iter().map(|row| line(row)));
    table.push(separator);
    table.join("\n")
}

/// Prints the console summary table
pub fn print_summary(products: &[Product]) {
    println!("{}", summary_table(products));
}

/// Writes screenshots and HTML dumps of visited pages for post-mortem debugging
#[derive(Debug, Clone, Default)]
pub struct DebugSnapshots {
    dir: Option<PathBuf>,
}

impl DebugSnapshots {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    /// Captures `<label>.png` and `<label>.html`; failures are logged, never propagated
    pub async fn capture<B: BrowserSession>(&self, session: &B, label: &str) {
        let Some(dir) = &self.dir else {
            return;
        };
        ::log::info!("Debug snapshot: {}", label);

        if let Err(e) = self.try_capture(dir, session, label).await {
            ::log::warn!("Failed to write debug snapshot {}: {}", label, e);
        }
    }

    async fn try_capture<B: BrowserSession>(
        &self,
        dir: &Path,
        session: &B,
        label: &str,
    ) -> Result<(), ScrapeError> {
        tokio::fs::create_dir_all(dir).await?;
        let name = sanitize_filename(label);

        let png = session.screenshot().await?;
        tokio::fs::write(dir.join(format!("{}.png", name)), png).await?;

        let html = session.source().await?;
        tokio::fs::write(dir.join(format!("{}.html", name)), html).await?;
        Ok(())
    }
}
