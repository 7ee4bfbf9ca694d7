use super::{load_data, ui};
use crate::service::ConversionService;
use anyhow::Result;
use comfy_table::Cell;

pub fn display_as_table(service: &ConversionService) -> String {
    let theme = service.theme();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code", theme),
        ui::header_cell("Name", theme),
    ]);

    for (code, name) in service.get_available_currencies() {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }

    table.to_string()
}

pub async fn run(service: &mut ConversionService) -> Result<()> {
    load_data(service).await?;
    println!("{}", display_as_table(service));
    Ok(())
}
