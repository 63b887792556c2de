//! Integration tests for cascade questions: stages, option tree and pruning

use form_schema::cascade::generated_label;
use form_schema::{
    Address, EditorConfig, Form, OptionNode, OptionTree, QuestionType, SequentialIds, StageError,
};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Region/City cascade built through the public tree operations
#[test]
fn test_region_city_scenario() {
    init_logging();

    let tree = OptionTree::new();
    let tree = tree
        .insert_child(&Address::root(), OptionNode::labelled("Region option 0"))
        .unwrap();
    let tree = tree
        .insert_child(&Address::from([0]), OptionNode::labelled("City option 0.0"))
        .unwrap();

    assert_eq!(
        serde_json::to_value(&tree).unwrap(),
        json!([{
            "value": "Region option 0",
            "label": "Region option 0",
            "children": [{ "value": "City option 0.0", "label": "City option 0.0" }]
        }])
    );

    let pruned = tree.prune_depth(1);
    let region = pruned.get(&Address::from([0])).unwrap();
    assert_eq!(region.value, "Region option 0");
    assert!(region.children().is_empty());
    assert!(pruned.get(&Address::from([0, 0])).is_none());
    assert_eq!(pruned.depth(), 1);
    // pruned levels drop the `children` key rather than leaving `[]`
    assert_eq!(
        serde_json::to_value(&pruned).unwrap(),
        json!([{ "value": "Region option 0", "label": "Region option 0" }])
    );
    let reloaded: OptionTree = serde_json::from_value(json!([
        { "value": "Region option 0", "label": "Region option 0", "children": [] }
    ]))
    .unwrap();
    assert_eq!(reloaded.get(&Address::from([0])).unwrap().children(), region.children());

    // the earlier snapshot is untouched
    assert_eq!(tree.get(&Address::from([0, 0])).unwrap().value, "City option 0.0");
}

/// Same scenario driven through the form, the question and its stage slots
#[test]
fn test_stage_editing_through_form() {
    init_logging();
    let ids = SequentialIds::new(1_000);
    let config = EditorConfig::default();

    let mut form = Form::with_first_section("Locations", &ids);
    let q = form.add_question(0, &ids).unwrap();
    form.change_type(0, q, QuestionType::Cascader, &config).unwrap();

    let mut manager = form
        .question(0, q)
        .unwrap()
        .stage_manager(config.expert)
        .unwrap();
    manager.add_stage();
    manager.select(0, Some("geo.region")).unwrap();
    manager.add_stage();
    assert!(matches!(
        manager.select(1, Some("person.city")),
        Err(StageError::GroupMismatch { .. })
    ));
    manager.select(1, Some("geo.city")).unwrap();
    assert!(manager.options_editable());

    form.edit_question(0, q, |question| {
        question.commit_stages(&manager)?;
        let tree = question.cascade_tree().cloned().unwrap_or_default();
        let tree = manager.add_generated_option(&tree, &Address::root())?;
        let tree = manager.add_generated_option(&tree, &Address::root())?;
        let tree = manager.add_generated_option(&tree, &Address::from([1]))?;
        question.set_cascade_tree(tree)
    })
    .unwrap();

    let question = form.question(0, q).unwrap();
    assert_eq!(question.stages(), &["geo.region".to_string(), "geo.city".to_string()]);
    let tree = question.cascade_tree().unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(
        tree.get(&Address::from([1, 0])).unwrap().label,
        generated_label("geo.city", &Address::from([1, 0]))
    );

    form.edit_question(0, q, |question| question.remove_stage(&mut manager))
        .unwrap();

    let question = form.question(0, q).unwrap();
    assert_eq!(question.stages(), &["geo.region".to_string()]);
    let tree = question.cascade_tree().unwrap();
    assert_eq!(tree.depth(), 1);
    assert!(tree.nodes().iter().all(|n| n.children().is_empty()));
}

#[test]
fn test_failed_edits_leave_tree_valid() {
    let tree = OptionTree::from_nodes(vec![
        OptionNode::labelled("A").with_children(vec![OptionNode::labelled("A1")]),
    ]);

    assert!(tree.insert_child(&Address::from([3]), OptionNode::labelled("x")).is_err());
    assert!(tree.remove(&Address::from([0, 5])).is_err());
    assert!(tree.remove(&Address::root()).is_err());
    assert!(tree.set_value(&Address::from([1]), "v", "l").is_err());

    let removed = tree.remove(&Address::from([0, 0])).unwrap();
    assert!(removed.get(&Address::from([0, 0])).is_none());
    assert!(removed.get(&Address::from([0])).unwrap().has_children_list());
    assert_eq!(tree.get(&Address::from([0, 0])).unwrap().value, "A1");
}

#[test]
fn test_cascade_question_survives_save_format() {
    let ids = SequentialIds::new(1);
    let mut form = Form::with_first_section("Geo", &ids);
    let q = form.add_question(0, &ids).unwrap();
    form.change_type(0, q, QuestionType::Cascader, &EditorConfig::expert())
        .unwrap();
    form.edit_question(0, q, |question| {
        let tree = OptionTree::new()
            .insert_child(&Address::root(), OptionNode::labelled("North"))?;
        question.set_cascade_tree(tree)
    })
    .unwrap();

    let json = serde_json::to_string(&form).unwrap();
    let back: Form = serde_json::from_str(&json).unwrap();
    assert_eq!(back, form);
}
