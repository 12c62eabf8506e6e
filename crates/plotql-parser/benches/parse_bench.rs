use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use plotql_parser::{Lexer, Parser};

const SIMPLE: &str = "SELECT id, name FROM metrics WHERE id = 42";

const COMPLEX: &str = "SELECT host, avg(latency) AS mean, count(*) \
     FROM requests, deployments \
     WHERE region = 'eu-west' AND latency + jitter * 2 = threshold ^ 2 \
     GROUP BY host, region \
     HAVING mean = 1 \
     ORDER BY mean DESC, host ASC \
     LIMIT 100 OFFSET 20";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, sql) in [("simple", SIMPLE), ("complex", COMPLEX)] {
        let bytes = u64::try_from(sql.len()).expect("query length fits u64");
        group.throughput(Throughput::Bytes(bytes));

        group.bench_with_input(BenchmarkId::new("tokenize", name), &sql, |b, sql| {
            b.iter(|| {
                let (tokens, errors) = Lexer::tokenize(black_box(sql));
                black_box((tokens, errors));
            });
        });

        group.bench_with_input(BenchmarkId::new("parse_all", name), &sql, |b, sql| {
            b.iter(|| {
                let (ast, errors) = Parser::from_sql(black_box(sql)).parse_all();
                black_box((ast, errors));
            });
        });
    }

    group.finish();
}

fn bench_deep_expression(c: &mut Criterion) {
    // A long left-leaning operator chain; stresses the Pratt climb loop.
    let mut sql = String::from("SELECT 1");
    for i in 0..200 {
        sql.push_str(" + ");
        sql.push_str(&i.to_string());
    }

    c.bench_function("parse/operator_chain_200", |b| {
        b.iter(|| {
            let (ast, errors) = Parser::from_sql(black_box(&sql)).parse_all();
            black_box((ast, errors));
        });
    });
}

criterion_group!(benches, bench_parse, bench_deep_expression);
criterion_main!(benches);
