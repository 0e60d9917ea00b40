//! Integration tests for the cursor-safe list under AST-rewriting workloads
//!
//! These drive the list the way a tree-transform pass does: visitors that
//! replace, splice and remove nodes mid-traversal, shared payload handles,
//! and re-entrant walks over the same sequence.

use std::rc::Rc;

use ecss_lexer::List;

#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: &'static str,
}

fn nodes(names: &[&'static str]) -> List<Node> {
    names.iter().map(|name| Node { name }).collect()
}

fn names(list: &List<Node>) -> Vec<&'static str> {
    list.iter().map(|node| node.name).collect()
}

#[test]
fn rewrite_pass_replaces_nodes_in_place() {
    // a pass that expands every "shorthand" node into two longhand nodes
    let mut list = nodes(&["margin", "shorthand", "color"]);
    list.for_each(|list, id| {
        if list.data(id).name == "shorthand" {
            let replacement = nodes(&["longhand-a", "longhand-b"]);
            list.replace_with_list(id, replacement);
        }
    });
    assert_eq!(names(&list), vec!["margin", "longhand-a", "longhand-b", "color"]);
}

#[test]
fn filter_pass_removes_while_walking() {
    let mut list = nodes(&["keep", "drop", "keep", "drop", "drop", "keep"]);
    let mut visited = 0;
    list.for_each(|list, id| {
        visited += 1;
        if list.data(id).name == "drop" {
            list.remove(id);
        }
    });
    assert_eq!(visited, 6, "every node visited exactly once");
    assert_eq!(names(&list), vec!["keep", "keep", "keep"]);
}

#[test]
fn shared_payloads_stay_shared_across_copy() {
    let shared = Rc::new("payload".to_string());
    let mut list: List<Rc<String>> = List::new();
    list.push_back(Rc::clone(&shared));
    list.push_back(Rc::new("own".to_string()));

    let copied = list.copy();
    assert_eq!(copied.len(), 2);
    // structure is deep-copied, data is shared: 1 local + 1 in each list
    assert_eq!(Rc::strong_count(&shared), 3);

    // structural independence
    list.pop_front();
    assert_eq!(copied.len(), 2);
    assert_eq!(Rc::strong_count(&shared), 2);
}

#[test]
fn reverse_pass_with_mutation() {
    let mut list = nodes(&["a", "b", "c", "d"]);
    let mut visited = Vec::new();
    list.for_each_right(|list, id| {
        visited.push(list.data(id).name);
        if list.data(id).name == "c" {
            // removing the item the reverse cursor will visit next
            let prev = list.prev_id(id).expect("prev");
            list.remove(prev);
        }
    });
    assert_eq!(visited, vec!["d", "c", "a"]);
    assert_eq!(names(&list), vec!["a", "c", "d"]);
}

#[test]
fn reentrant_walks_with_edits_converge() {
    let mut list = nodes(&["x", "y", "z"]);
    let mut log = Vec::new();
    list.for_each(|list, outer| {
        let outer_name = list.data(outer).name;
        list.for_each(|list, inner| {
            if outer_name == "x" && list.data(inner).name == "y" {
                list.remove(inner);
            }
        });
        log.push(outer_name);
    });
    assert_eq!(log, vec!["x", "z"]);
    assert_eq!(names(&list), vec!["x", "z"]);
}

#[test]
fn next_until_scans_a_subrange() {
    let mut list = nodes(&["a", "b", "stop", "c"]);
    let mut seen = Vec::new();
    let start = list.first_id();
    list.next_until(start, |list, id| {
        seen.push(list.data(id).name);
        list.data(id).name == "stop"
    });
    assert_eq!(seen, vec!["a", "b", "stop"]);
}

#[test]
fn building_blocks_compose() {
    let mut list: List<i32> = List::new();
    assert!(list.is_empty());
    list.extend([1, 2, 3]);
    list.push_front(0);

    let doubled = list.map(|value| value * 2);
    assert_eq!(doubled.to_vec(), vec![0, 2, 4, 6]);

    let evens = list.filter(|value| value % 2 == 0);
    assert_eq!(evens.to_vec(), vec![0, 2]);

    let total = list.reduce(0, |list, accumulator, id| accumulator + *list.data(id));
    assert_eq!(total, 6);

    assert!(list.some(|list, id| *list.data(id) == 3));
    assert!(!list.some(|list, id| *list.data(id) == 42));

    let from_vec: List<i32> = vec![9, 8].into();
    assert_eq!(from_vec.to_vec(), vec![9, 8]);
}

#[test]
fn serializes_node_payloads() {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Payload {
        kind: &'static str,
    }

    let mut list: List<Payload> = List::new();
    list.push_back(Payload { kind: "Rule" });
    list.push_back(Payload { kind: "Comment" });

    let json = serde_json::to_string(&list).expect("serializes");
    assert_eq!(json, r#"[{"kind":"Rule"},{"kind":"Comment"}]"#);
}
