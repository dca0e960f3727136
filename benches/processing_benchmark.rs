use air_quality_processor::models::{AirQualityRecord, Pollutant, WindCategory};
use air_quality_processor::processors::{
    daily_mean, hourly_means, pollutant_totals, station_means, wind_distribution, RiskScorer,
    TimeFilter,
};
use air_quality_processor::readers::RecordReader;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Hourly readings for `station_count` stations over `days` days
fn create_test_table(station_count: usize, days: usize) -> Vec<AirQualityRecord> {
    let base = NaiveDate::from_ymd_opt(2016, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut records = Vec::with_capacity(station_count * days * 24);

    for station in 0..station_count {
        let name = format!("Station {}", station);
        for hour in 0..(days * 24) {
            let timestamp = base + Duration::hours(hour as i64);
            let wave = ((hour % 24) as f64 - 12.0).abs();
            let mut record = AirQualityRecord::new(name.clone(), timestamp)
                .with_wind_category(WindCategory::from_speed(wave / 2.0));
            for (i, &pollutant) in Pollutant::ALL.iter().enumerate() {
                let value = 20.0 + wave * (i + 1) as f64 + (station * 7 % 50) as f64;
                record = record.with_pollutant(pollutant, value);
            }
            records.push(record);
        }
    }

    records
}

fn create_test_csv(rows: usize) -> String {
    let mut csv = String::from(
        "year,month,day,hour,station,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,WSPM,wind_category\n",
    );
    for i in 0..rows {
        csv.push_str(&format!(
            "2016,{},{},{},Station {},{},NA,4,30,600,50,8.5,1015,-3,0,{:.1},Light Breeze\n",
            i % 12 + 1,
            i % 28 + 1,
            i % 24,
            i % 12,
            (i % 300) as f64 * 1.5,
            (i % 40) as f64 / 10.0,
        ));
    }
    csv
}

fn benchmark_csv_parsing(c: &mut Criterion) {
    let csv = create_test_csv(5_000);

    c.bench_function("record_reader", |b| {
        b.iter(|| {
            let records = RecordReader::new().read_from(csv.as_bytes());
            black_box(records.map(|r| r.len()).unwrap_or(0))
        })
    });
}

fn benchmark_aggregations(c: &mut Criterion) {
    let records = create_test_table(12, 30);
    let start = NaiveDate::from_ymd_opt(2016, 1, 5).unwrap();
    let end = NaiveDate::from_ymd_opt(2016, 1, 25).unwrap();

    c.bench_function("time_filter", |b| {
        b.iter(|| {
            let window = TimeFilter::new(start, end).unwrap();
            black_box(window.apply(&records).len())
        })
    });

    c.bench_function("aggregations", |b| {
        b.iter(|| {
            black_box(daily_mean(&records).len());
            black_box(pollutant_totals(&records).len());
            black_box(station_means(&records).len());
            black_box(hourly_means(&records).len());
            black_box(wind_distribution(&records, Pollutant::Pm25).len())
        })
    });
}

fn benchmark_risk_scoring(c: &mut Criterion) {
    let records = create_test_table(12, 30);
    let scorer = RiskScorer::new();

    c.bench_function("risk_score_single", |b| {
        b.iter(|| {
            let report = scorer.score(&records, Pollutant::Co);
            black_box(report.map(|r| r.scores.len()).unwrap_or(0))
        })
    });

    c.bench_function("risk_score_all", |b| {
        b.iter(|| black_box(scorer.score_all(&records).len()))
    });
}

fn benchmark_varying_station_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_by_station_count");

    for &size in &[10, 50, 100, 500] {
        group.bench_with_input(
            BenchmarkId::new("stations", size),
            &size,
            |b, &station_count| {
                let records = create_test_table(station_count, 7);
                let scorer = RiskScorer::new();

                b.iter(|| {
                    let report = scorer.score(&records, Pollutant::Pm10);
                    black_box(report.map(|r| r.scores.len()).unwrap_or(0))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_csv_parsing,
    benchmark_aggregations,
    benchmark_risk_scoring,
    benchmark_varying_station_counts
);
criterion_main!(benches);
