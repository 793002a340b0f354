use criterion::{black_box, criterion_group, criterion_main, Criterion};
use screenweave_parser::{parse, print};

fn parse_simple_screen(c: &mut Criterion) {
    let source = "export default function Home() { return <div>Home Screen</div>; }";

    c.bench_function("parse_simple_screen", |b| b.iter(|| parse(black_box(source))));
}

fn parse_medium_screen(c: &mut Criterion) {
    let mut source = String::from(
        "import { createSignal } from \"solid-js\";\n\nexport default function Dashboard() {\n  const [count, setCount] = createSignal(0);\n  return (\n    <div class=\"dashboard\">\n",
    );
    for i in 0..50 {
        source.push_str(&format!(
            "      <button id=\"comp-{i}\" class=\"btn\" disabled={{false}} onClick={{() => setCount(count() + {i})}}>Button {i}</button>\n"
        ));
    }
    source.push_str("    </div>\n  );\n}\n");

    c.bench_function("parse_medium_screen", |b| b.iter(|| parse(black_box(&source))));
}

fn print_unedited_screen(c: &mut Criterion) {
    let mut source = String::from("export default function Big() {\n  return (\n    <div>\n");
    for i in 0..200 {
        source.push_str(&format!(
            "      <button id=\"comp-{i}\" data-index={{{i}}}>Item {{\"{i}\"}}</button>\n"
        ));
    }
    source.push_str("    </div>\n  );\n}\n");
    let tree = parse(&source).expect("bench source parses");

    c.bench_function("print_unedited_screen", |b| b.iter(|| print(black_box(&tree))));
}

criterion_group!(
    benches,
    parse_simple_screen,
    parse_medium_screen,
    print_unedited_screen
);
criterion_main!(benches);
