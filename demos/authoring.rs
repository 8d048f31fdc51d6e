use block_conditions::{
    Action, ConditionKind, ConditionPatch, ConditionsError, EditState, Session, catalog_by_group,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConditionsError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Select a condition to add:");
    for (group, kinds) in catalog_by_group() {
        println!("  {group}");
        for info in kinds {
            println!("    {:<32} {}", info.label, info.description);
        }
    }
    println!();

    let session = Session::from_json(r#"{"action":"show","conditions":[]}"#)?;
    let session = session.set_action(Action::Hide);
    let (session, id) = session.add_condition(ConditionKind::QueryString);
    assert_eq!(session.state(&id), Some(EditState::Editing));

    let mut patch = ConditionPatch::new().label("Hide for ad campaigns");
    for (field, typed) in ConditionKind::QueryString.fields().iter().zip(["utm_source", "ads"]) {
        patch = patch.input(field, typed);
    }
    let session = session.update_condition(&id, &patch)?;
    let session = session.commit_edit(&id)?;

    for node in &session.document().conditions {
        println!("[{}] {}", node.id, node.display_label());
    }
    println!("{}", session.document().to_json()?);
    Ok(())
}
