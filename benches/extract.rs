// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use fx_scrape::{
    config::options::LayoutStrategy,
    session::PageContent,
    specs::averages,
};

/// A statistics page buried in a lot of unrelated rows.
fn synthetic_page(noise_rows: usize) -> PageContent {
    let mut html = String::from("<html><body>");
    let mut text = String::new();
    for i in 0..noise_rows {
        html.push_str(&format!(
            r#"<div class="flex flex-row"><span>Row {i}</span><span>{i}.1</span><span>{i}.2</span><span>{i}.3</span></div>"#
        ));
        text.push_str(&format!("Row {i}\t{i}.1\t{i}.2\t{i}.3\n"));
    }
    html.push_str(r#"<div class="flex flex-row"><span>Average</span><span>0.7432</span><span>0.7415</span><span>0.7398</span></div>"#);
    html.push_str("</body></html>");
    text.push_str("Average\t0.7432\t0.7415\t0.7398\n");
    PageContent { html, text: Some(text) }
}

fn bench_extract(c: &mut Criterion) {
    let page = synthetic_page(2_000);
    let cells = LayoutStrategy::cell_rows();
    let text = LayoutStrategy::TextRow;

    c.bench_function("extract_cell_rows", |b| {
        b.iter(|| {
            let t = averages::extract_page(black_box(&page), &cells).ok();
            black_box(t)
        })
    });

    c.bench_function("extract_text_rows", |b| {
        b.iter(|| {
            let t = averages::extract_page(black_box(&page), &text).ok();
            black_box(t)
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
