/// Menu bar with a File menu and the theme switch.
pub fn basic_menu_bar(ui: &mut egui::Ui, ctx: &egui::Context) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Quit").clicked() {
                log::debug!("quit requested from menu");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            egui::widgets::global_theme_preference_buttons(ui);
        });
    });
}
