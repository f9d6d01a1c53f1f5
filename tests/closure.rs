use trellis::{Dag, DagError, EdgeChange, RelationType, TypeRegistry, WeightVector};

fn new_dag() -> Dag {
    let registry = TypeRegistry::new(vec![
        RelationType::hierarchy(),
        RelationType::new("invalidate", "invalidated_by", "invalidates"),
    ])
    .expect("registry");
    Dag::new(registry)
}

fn weights(h: u32, i: u32) -> WeightVector {
    WeightVector::from_columns(vec![h, i])
}

#[test]
fn chain_produces_weight_two_row_and_deletion_unwinds_it() {
    let dag = new_dag();
    let ab = dag.connect(1, 2, "hierarchy").expect("a->b");
    dag.connect(2, 3, "hierarchy").expect("b->c");

    let ac = dag.closure_between(1, 3);
    assert_eq!(ac.len(), 1);
    assert_eq!(ac[0].weights, weights(2, 0));

    dag.disconnect(ab).expect("delete a->b");
    assert!(dag.closure_between(1, 3).is_empty());
    assert_eq!(dag.closure_between(2, 3).len(), 1, "b->c must remain");
}

#[test]
fn same_pair_distinct_types_persist_but_same_type_duplicates_do_not() {
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("hierarchy a->b");
    dag.connect(1, 2, "invalidate").expect("invalidate a->b");

    let rows = dag.closure_between(1, 2);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r.weights == weights(1, 0)));
    assert!(rows.iter().any(|r| r.weights == weights(0, 1)));

    assert!(matches!(
        dag.connect(1, 2, "hierarchy").expect_err("second hierarchy"),
        DagError::DuplicateEdge { .. }
    ));
}

#[test]
fn repointing_tail_retracts_and_rederives_through_new_node() {
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("a->b");
    let bc = dag.connect(2, 3, "hierarchy").expect("b->c");

    dag.update_edge(bc, EdgeChange::repoint_from(4))
        .expect("repoint b->c to d->c");

    assert!(dag.closure_between(1, 3).is_empty(), "a->c must disappear");
    assert_eq!(dag.closure_between(4, 3).len(), 1);

    // with a->d in place, repointing derives a->c again through d
    let dag = new_dag();
    dag.connect(1, 2, "hierarchy").expect("a->b");
    dag.connect(1, 4, "hierarchy").expect("a->d");
    let bc = dag.connect(2, 3, "hierarchy").expect("b->c");
    dag.update_edge(bc, EdgeChange::repoint_from(4))
        .expect("repoint");

    let ac = dag.closure_between(1, 3);
    assert_eq!(ac.len(), 1);
    assert_eq!(ac[0].weights, weights(2, 0));
}

#[test]
fn rejected_edge_leaves_closure_untouched() {
    let dag = new_dag();
    dag.connect(1, 2, "invalidate").expect("a->b");
    dag.connect(2, 3, "invalidate").expect("b->c");
    let before = dag.closure_rows();

    assert!(dag.connect(3, 1, "invalidate").is_err());
    assert!(dag.connect(3, 1, "hierarchy").is_err());

    assert_eq!(dag.closure_rows(), before);
}

#[test]
fn diamond_multiplicity_survives_partial_retraction() {
    let dag = new_dag();
    // two length-two paths 1 -> 5 plus a third via a longer chain
    dag.connect(1, 2, "invalidate").expect("1->2");
    let a = dag.connect(2, 5, "invalidate").expect("2->5");
    dag.connect(1, 3, "invalidate").expect("1->3");
    dag.connect(3, 5, "invalidate").expect("3->5");

    let shared = dag.closure_between(1, 5);
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].count, 2);

    dag.disconnect(a).expect("drop one justification");
    let shared = dag.closure_between(1, 5);
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].count, 1);

    dag.disconnect(dag.closure_between(3, 5)[0].id)
        .expect("drop the last justification");
    assert!(dag.closure_between(1, 5).is_empty());
}
