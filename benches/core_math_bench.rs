use graph_panel::api::{HostContext, PanelConfig, PlotInput, build_plot_spec};
use graph_panel::core::{
    AxisIndex, Sample, Series, TickFrequency, TickPlanRequest, TimeRange, plan_time_ticks,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const DAY_MS: i64 = 86_400_000;
const START_MS: i64 = 1_700_000_000_000;

fn bench_auto_tick_plan(c: &mut Criterion) {
    let request = TickPlanRequest::new(
        Some(START_MS as f64),
        Some((START_MS + 30 * DAY_MS) as f64),
        1_920.0,
    );

    c.bench_function("auto_tick_plan_30d", |b| {
        b.iter(|| plan_time_ticks(black_box(&request)))
    });
}

fn bench_calendar_tick_plan(c: &mut Criterion) {
    let request = TickPlanRequest::new(
        Some(START_MS as f64),
        Some((START_MS + 365 * DAY_MS) as f64),
        1_920.0,
    )
    .with_frequency(TickFrequency::Days)
    .with_offset("+6h");

    c.bench_function("calendar_tick_plan_365d", |b| {
        b.iter(|| plan_time_ticks(black_box(&request)))
    });
}

fn bench_plot_spec_10k(c: &mut Criterion) {
    let series: Vec<Series> = (0..4)
        .map(|index| {
            let samples = (0..10_000)
                .map(|i| {
                    let value = (i % 17 != 0).then(|| (i as f64 * 0.01).sin() * 100.0 + index as f64);
                    Sample::new((START_MS + i * 60_000) as f64, value)
                })
                .collect();
            let axis = if index == 3 { AxisIndex::Right } else { AxisIndex::Left };
            Series::new(format!("series-{index}"), samples).with_yaxis(axis)
        })
        .collect();

    let mut panel = PanelConfig::default();
    panel.stack = true;
    panel.yaxes[0].log_base = 10.0;
    panel.grid.threshold1 = Some(20.0);
    panel.grid.threshold2 = Some(60.0);
    let host = HostContext::new(1);
    let input = PlotInput {
        panel: &panel,
        host: &host,
        series: &series,
        annotations: &[],
        time_range: TimeRange::from_millis(START_MS, START_MS + 10_000 * 60_000),
        width: 1_920,
        panel_height: 600,
    };

    c.bench_function("plot_spec_4x10k", |b| {
        b.iter(|| build_plot_spec(black_box(&input)))
    });
}

criterion_group!(
    benches,
    bench_auto_tick_plan,
    bench_calendar_tick_plan,
    bench_plot_spec_10k
);
criterion_main!(benches);
