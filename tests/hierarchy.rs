//! Node-view behaviors of the single-parent hierarchy type.

use trellis::{Dag, RelationType, TypeRegistry};

fn new_dag() -> Dag {
    let registry = TypeRegistry::new(vec![
        RelationType::hierarchy(),
        RelationType::new("invalidate", "invalidated_by", "invalidates"),
    ])
    .expect("registry");
    Dag::new(registry)
}

#[test]
fn fresh_node_is_a_leaf_without_relations() {
    let dag = new_dag();
    assert!(dag.is_leaf(1, "hierarchy").expect("leaf"));
    assert!(!dag.is_child(1, "hierarchy").expect("child"));
    assert!(dag.children(1, "hierarchy").expect("children").is_empty());
    assert!(dag.parent(1, "hierarchy").expect("parent").is_none());
    assert!(!dag.in_closure(1, 2));
}

#[test]
fn children_are_direct_only() {
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("child");
    dag.connect(2, 3, "hierarchy").expect("grandchild");

    assert_eq!(dag.children(1, "hierarchy").expect("children"), vec![2]);
    assert_eq!(
        dag.descendants(1, "hierarchy").expect("descendants"),
        vec![2, 3]
    );
    assert!(!dag.is_leaf(1, "hierarchy").expect("leaf"));
}

#[test]
fn ancestors_accumulate_up_the_chain() {
    let dag = new_dag();
    dag.connect(2, 1, "hierarchy").expect("parent");
    dag.connect(3, 2, "hierarchy").expect("grandparent");

    assert_eq!(dag.parent(1, "hierarchy").expect("parent"), Some(2));
    assert_eq!(dag.ancestors(1, "hierarchy").expect("ancestors"), vec![2, 3]);
    assert!(dag.is_child(1, "hierarchy").expect("child"));
    assert!(dag.in_closure(1, 3));
    assert!(dag.in_closure(3, 1));
}

#[test]
fn typed_views_do_not_mix_relation_types() {
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("hierarchy");
    dag.connect(1, 3, "invalidate").expect("invalidate");

    assert_eq!(dag.descendants(1, "hierarchy").expect("descendants"), vec![2]);
    assert_eq!(
        dag.descendants(1, "invalidate").expect("descendants"),
        vec![3]
    );
    assert!(dag.is_leaf(2, "invalidate").expect("leaf"));
}

#[test]
fn inserting_parent_between_builds_complete_hierarchy() {
    // 1 has child 2; 3 has child 4; making 3 a child of 2 connects all
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("1->2");
    dag.connect(3, 4, "hierarchy").expect("3->4");
    dag.connect(2, 3, "hierarchy").expect("2->3");

    assert_eq!(
        dag.descendants(1, "hierarchy").expect("descendants"),
        vec![2, 3, 4]
    );
    assert_eq!(dag.ancestors(4, "hierarchy").expect("ancestors"), vec![1, 2, 3]);
}

#[test]
fn removing_parent_detaches_the_subtree() {
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("1->2");
    let child = dag.connect(2, 3, "hierarchy").expect("2->3");
    dag.connect(3, 4, "hierarchy").expect("3->4");

    dag.disconnect(child).expect("remove parent link");

    assert_eq!(dag.descendants(1, "hierarchy").expect("descendants"), vec![2]);
    assert!(dag.children(2, "hierarchy").expect("children").is_empty());
    assert_eq!(dag.ancestors(4, "hierarchy").expect("ancestors"), vec![3]);
}

#[test]
fn single_parent_rule_holds_until_the_slot_frees_up() {
    let dag = new_dag();
    let first = dag.connect(1, 3, "hierarchy").expect("first parent");
    assert!(dag.connect(2, 3, "hierarchy").is_err());

    dag.disconnect(first).expect("free the slot");
    dag.connect(2, 3, "hierarchy").expect("second parent now fits");
    assert_eq!(dag.parent(3, "hierarchy").expect("parent"), Some(2));
}
