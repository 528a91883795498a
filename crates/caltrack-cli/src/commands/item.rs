//! Item command handlers

use anyhow::{bail, Result};

use caltrack_core::{Config, FormInput, Intent, Item, ItemId};

use super::{open, CliCoordinator};
use crate::output::Output;
use crate::prompt::confirm;

/// Add a new item
pub fn add(config: &Config, name: String, calories: String, output: &Output) -> Result<()> {
    let mut coordinator = open(config);

    coordinator.dispatch(Intent::SubmitNew(FormInput::new(name, calories)))?;

    // New items are appended
    if let Some(item) = coordinator.store().list().last() {
        output.success(&format!("Added item {}", item.id));
        output.print_item(item);
    }
    let view = coordinator.renderer();
    output.message(&format!("Total Calories: {}", view.total));

    Ok(())
}

/// List all items with the total
pub fn list(config: &Config, output: &Output) -> Result<()> {
    let mut coordinator = open(config);
    coordinator.start();

    let view = coordinator.renderer();
    let items: &[Item] = if view.visible { view.items.as_slice() } else { &[] };
    output.print_items(items, view.total);

    Ok(())
}

/// Edit an item's name and/or calories
///
/// Fields left as `None` keep their current values.
pub fn edit(
    config: &Config,
    id: u64,
    name: Option<String>,
    calories: Option<String>,
    output: &Output,
) -> Result<()> {
    if name.is_none() && calories.is_none() {
        bail!("Nothing to change. Pass --name and/or --calories.");
    }

    let mut coordinator = open(config);
    select(&mut coordinator, id)?;

    // Edit mode pre-fills the form from the stored item
    let mut form = coordinator.renderer().form.clone();
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(calories) = calories {
        form.calories = calories;
    }

    coordinator.dispatch(Intent::SubmitUpdate(form))?;

    if let Some(item) = coordinator.store().get_by_id(ItemId(id)) {
        output.success(&format!("Updated item {}", item.id));
        output.print_item(item);
    }

    Ok(())
}

/// Delete an item
pub fn delete(config: &Config, id: u64, yes: bool, output: &Output) -> Result<()> {
    let mut coordinator = open(config);
    select(&mut coordinator, id)?;

    if !yes && output.should_prompt() {
        let form = &coordinator.renderer().form;
        println!("Delete item {}: {} ({} Calories)", id, form.name, form.calories);
        if !confirm("Are you sure?")? {
            coordinator.dispatch(Intent::CancelEdit)?;
            println!("Cancelled.");
            return Ok(());
        }
    }

    coordinator.dispatch(Intent::RequestDelete)?;

    output.success(&format!("Deleted item {}", id));
    output.message(&format!(
        "Total Calories: {}",
        coordinator.renderer().total
    ));

    Ok(())
}

/// Delete every item
pub fn clear(config: &Config, yes: bool, output: &Output) -> Result<()> {
    let mut coordinator = open(config);
    let count = coordinator.store().len();

    if count > 0
        && !yes
        && output.should_prompt()
        && !confirm(&format!("Delete all {} item(s)?", count))?
    {
        println!("Cancelled.");
        return Ok(());
    }

    // An unreadable snapshot loads as empty but still has to go
    coordinator.dispatch(Intent::RequestClear)?;

    if count == 0 {
        output.message("No items to clear.");
    } else {
        output.success(&format!("Cleared {} item(s)", count));
    }

    Ok(())
}

/// Print the total calories
pub fn total(config: &Config, output: &Output) -> Result<()> {
    let mut coordinator = open(config);
    coordinator.start();

    output.print_total(coordinator.renderer().total, coordinator.store().len());

    Ok(())
}

/// Put the coordinator in edit mode for `id`, failing if it doesn't exist
fn select(coordinator: &mut CliCoordinator, id: u64) -> Result<()> {
    coordinator.dispatch(Intent::RequestEdit(ItemId(id)))?;

    if coordinator.selection() != Some(ItemId(id)) {
        bail!("Item not found: {}", id);
    }

    Ok(())
}
