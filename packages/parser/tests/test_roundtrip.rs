//! Round-trip tests for the codec
//!
//! Validates:
//! - print(parse(s)) == s for unedited trees
//! - Further parse/print cycles are stable
//! - Surrounding module code is never touched

use screenweave_parser::{parse, print};

const SAMPLES: &[&str] = &[
    "export default function Home() { return <div>Home Screen</div>; }",
    r#"import { Component } from "solid-js";
import styles from "./App.module.css";

const App: Component = () => {
  const label = count() < 10 ? "low" : "high";
  return (
    <div class={styles.app}>
      {/* toolbar */}
      <button id="comp-a1" class="btn" disabled onClick={() => console.log('Button clicked')}>
        Click
      </button>
      <button id="comp-a2" disabled={false} data-count={3}>{label}</button>
    </div>
  );
};

export default App;
"#,
    "export const View = () => <>\n\t<span title='single'>x</span>\n\t{list.map(item => <li key={item.id}>{`${item.name}`}</li>)}\n</>;\n",
    "function A() {\n  if (a > b) { return null; }\n  return <img src=\"x.png\" alt=\"\" />;\n}\n",
];

#[test]
fn test_unedited_trees_print_byte_for_byte() {
    for source in SAMPLES {
        let tree = parse(source).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e));
        assert_eq!(&print(&tree), source);
    }
}

#[test]
fn test_print_parse_cycles_are_stable() {
    for source in SAMPLES {
        let once = print(&parse(source).unwrap());
        let twice = print(&parse(&once).unwrap());
        let thrice = print(&parse(&twice).unwrap());
        assert_eq!(once, twice);
        assert_eq!(twice, thrice);
    }
}

#[test]
fn test_failed_parse_returns_error_not_partial_tree() {
    let broken = "export default function Home() { return <div>Home Screen</span>; }";
    let err = parse(broken).unwrap_err();
    assert!(err.pos() > 0);
    assert!(err.pos() < broken.len());
}
