use super::*;
use crate::graph::builder::GraphBuilder;

#[test]
fn empty_graph() {
    let builder = GraphBuilder::new();

    assert_eq!(builder.dump(), "");
}

#[test]
fn composites_print_member_names() {
    let mut b = GraphBuilder::new();
    b.build_struct(2, &[("name", 0), ("tags", 1)]).unwrap();
    b.build_lambda(3, 4, &["x", "y"], None).unwrap();

    insta::assert_snapshot!(GraphPrinter::new(&b.graph).dump(), @r"
    #0: [..]
    #1: [..]
    #2: {name:#0, tags:#1}
    V0 -> #2
    x: [..]
    y: [..]
    #3: [..]
    #4: (x, y)->#3
    V1 -> #4
    ");
}

#[test]
fn hidden_refs() {
    let mut b = GraphBuilder::new();
    b.bind_var("x", 0).unwrap();
    b.build_array(1, &[0]).unwrap();

    insta::assert_snapshot!(GraphPrinter::new(&b.graph).show_refs(false).dump(), @r"
    x: [..] <: V0
    V0: [..]
    #1: V0[]
    ");
}
