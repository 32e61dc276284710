use criterion::{Criterion, criterion_group, criterion_main};
use scrolly_chart::datagen::{CsvTable, pivot_longer};
use scrolly_chart::interaction::{
    ScrollVisibilityTracker, StepDetector, StepRegion, TriggerPolicy, ViewportWindow,
    VisibilityTracker,
};
use std::fmt::Write as _;
use std::hint::black_box;

fn bench_scroll_through_1k_regions(c: &mut Criterion) {
    let policy = TriggerPolicy::majority_visible();
    let regions: Vec<StepRegion> = (0..1_000)
        .map(|i| StepRegion::new(i.to_string(), f64::from(i) * 480.0, 480.0))
        .collect();
    let detector = StepDetector::new(policy);

    c.bench_function("scroll_through_1k_regions", |b| {
        b.iter(|| {
            let mut tracker = ScrollVisibilityTracker::new(policy, regions.clone());
            let mut activations = 0_usize;
            for scroll_top in (0..480_000).step_by(240) {
                let batch = tracker.observe(ViewportWindow::new(f64::from(scroll_top), 900.0));
                detector.forward(black_box(&batch), |_| activations += 1);
            }
            black_box(activations)
        })
    });
}

fn bench_pivot_monthly_indicators(c: &mut Criterion) {
    let mut csv = String::from("DATE,UNRATE,CPIAUCSL,FEDFUNDS,PAYEMS\n");
    for month in 0..900 {
        let year = 1950 + month / 12;
        let _ = writeln!(
            csv,
            "{year}-{:02}-01,{:.1},{:.3},{:.2},{}",
            month % 12 + 1,
            4.0 + f64::from(month % 37) * 0.1,
            24.0 + f64::from(month) * 0.3,
            f64::from(month % 23) * 0.25,
            40_000 + month * 120
        );
    }
    let table = CsvTable::from_text(&csv).expect("csv");
    let series: Vec<String> = ["UNRATE", "CPIAUCSL", "FEDFUNDS", "PAYEMS"]
        .iter()
        .map(|s| (*s).to_owned())
        .collect();

    c.bench_function("pivot_monthly_indicators_900x4", |b| {
        b.iter(|| {
            let observations =
                pivot_longer(black_box(&table), "DATE", black_box(&series)).expect("pivot");
            black_box(observations.len())
        })
    });
}

criterion_group!(
    benches,
    bench_scroll_through_1k_regions,
    bench_pivot_monthly_indicators
);
criterion_main!(benches);
