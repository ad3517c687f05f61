//! egui dashboard: category selector, query inputs, rating estimate and data description.

mod fields;
mod sections;
mod style;

use eframe::egui::{self, RichText};
use tracing::{info, warn};

use crate::catalog::{self, CategoryEntry};
use crate::config::AppSettings;
use crate::estimator::UserQuery;
use crate::pipeline::{self, DashboardSnapshot};
use crate::store::{self, DocumentStore};

/// Minimum window size for the dashboard.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

/// Blocks of the center panel, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Estimate,
    Description,
    Charts,
}

/// Selection, query text and the snapshot computed for them.
pub struct DashboardState {
    pub category: &'static CategoryEntry,
    pub query: UserQuery,
    pub show_description: bool,
    snapshot: Option<Result<DashboardSnapshot, String>>,
    needs_refresh: bool,
}

impl DashboardState {
    pub fn new(query: UserQuery) -> Self {
        Self {
            category: catalog::default_category(),
            query,
            show_description: false,
            snapshot: None,
            needs_refresh: true,
        }
    }

    pub fn snapshot(&self) -> Option<&Result<DashboardSnapshot, String>> {
        self.snapshot.as_ref()
    }

    /// Switch category; the next refresh refits.
    pub fn select_category(&mut self, entry: &'static CategoryEntry) {
        if self.category != entry {
            info!(category = entry.display_name, "Category selected");
            self.category = entry;
            self.needs_refresh = true;
        }
    }

    /// Force a full refresh on the next frame.
    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Sections shown for a loaded snapshot. Only the description is optional.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = vec![Section::Estimate];
        if self.show_description {
            sections.push(Section::Description);
        }
        sections.push(Section::Charts);
        sections
    }

    /// Rebuild the snapshot when the selection changed.
    pub fn refresh(&mut self, store: &dyn DocumentStore, settings: &AppSettings) {
        if !self.needs_refresh {
            return;
        }
        self.needs_refresh = false;
        let result = pipeline::run(store, settings, self.category.display_name, &self.query);
        self.snapshot = Some(result.map_err(|err| {
            warn!(kind = err.kind(), "Dashboard refresh failed: {err}");
            err.to_string()
        }));
    }

    /// Re-predict after a query edit without refitting.
    pub fn query_changed(&mut self) {
        if let Some(Ok(snapshot)) = self.snapshot.as_mut() {
            snapshot.update_estimate(&self.query);
        }
    }
}

/// eframe application hosting the dashboard.
pub struct DashboardApp {
    store: Box<dyn DocumentStore>,
    settings: AppSettings,
    state: DashboardState,
    visuals_set: bool,
}

impl DashboardApp {
    /// Create the app from loaded settings, opening the configured store.
    pub fn new(settings: AppSettings) -> Result<Self, String> {
        let store = store::open_store(&settings.store)
            .map_err(|err| format!("Failed to open document store: {err}"))?;
        Ok(Self::with_store(store, settings))
    }

    pub fn with_store(store: Box<dyn DocumentStore>, settings: AppSettings) -> Self {
        let state = DashboardState::new(settings.query.clone());
        Self {
            store,
            settings,
            state,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_categories(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("categories")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Category");
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("category_scroll")
                    .show(ui, |ui| {
                        for entry in catalog::categories() {
                            let selected = self.state.category == entry;
                            if ui.selectable_label(selected, entry.display_name).clicked() {
                                self.state.select_category(entry);
                            }
                        }
                    });
            });
    }

    fn render_query(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        ui.horizontal_wrapped(|ui| {
            let query = &mut self.state.query;
            let inputs = [
                ("Min price", &mut query.min_price),
                ("Max price", &mut query.max_price),
                ("Sold", &mut query.sold),
                ("Shipping", &mut query.shipping),
            ];
            for (label, value) in inputs {
                ui.label(label);
                let response = fields::QueryField::new(value, ui.id().with(label))
                    .hint("number")
                    .show(ui);
                changed |= response.changed();
                ui.add_space(8.0);
            }
        });
        if changed {
            self.state.query_changed();
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(self.state.category.display_name).strong());
                ui.separator();
                ui.checkbox(&mut self.state.show_description, "Show data description");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Refresh").clicked() {
                        self.state.request_refresh();
                    }
                });
            });
        });
    }

    fn render_center(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Rating estimate");
            self.render_query(ui);
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("dashboard_scroll")
                .show(ui, |ui| match self.state.snapshot() {
                    None => {
                        ui.spinner();
                    }
                    Some(Err(message)) => sections::error_banner(ui, message),
                    Some(Ok(snapshot)) => {
                        for (idx, section) in self.state.sections().into_iter().enumerate() {
                            if idx > 0 {
                                ui.separator();
                            }
                            match section {
                                Section::Estimate => sections::estimate(ui, snapshot),
                                Section::Description => sections::description(ui, snapshot),
                                Section::Charts => sections::charts(ui, snapshot),
                            }
                        }
                    }
                });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.state.refresh(self.store.as_ref(), &self.settings);
        self.render_top_bar(ctx);
        self.render_categories(ctx);
        self.render_center(ctx);
        if self.state.needs_refresh() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn store() -> MemoryStore {
        let records = (0..8)
            .map(|i| {
                let i = i as f64;
                json!({
                    "Title": "t", "Store": "s", "URL": "u",
                    "PriceMin": 1.0 + i, "PriceMax": 3.0 + i, "Sold": 5.0 * i,
                    "Shipping": 1.0, "Rating": 4.0 + (i % 2.0) * 0.5,
                })
                .as_object()
                .cloned()
                .unwrap()
            })
            .collect();
        MemoryStore::new().with_collection("AE_Items", "Appliances", records)
    }

    fn settings() -> AppSettings {
        let mut settings = AppSettings::default();
        settings.estimator.trees = 5;
        settings
    }

    #[test]
    fn refresh_runs_once_per_selection() {
        let store = store();
        let mut state = DashboardState::new(UserQuery::default());
        assert!(state.needs_refresh());
        state.refresh(&store, &settings());
        assert!(!state.needs_refresh());
        assert!(matches!(state.snapshot(), Some(Ok(_))));

        state.select_category(catalog::default_category());
        assert!(!state.needs_refresh());
    }

    #[test]
    fn charts_render_without_description() {
        let mut state = DashboardState::new(UserQuery::default());
        assert_eq!(state.sections(), vec![Section::Estimate, Section::Charts]);
        state.show_description = true;
        assert_eq!(
            state.sections(),
            vec![Section::Estimate, Section::Description, Section::Charts]
        );
    }

    #[test]
    fn missing_collection_shows_error() {
        let store = store();
        let mut state = DashboardState::new(UserQuery::default());
        let toys = catalog::find_by_collection("Toys").unwrap();
        state.select_category(toys);
        state.refresh(&store, &settings());
        let Some(Err(message)) = state.snapshot() else {
            panic!("expected an error snapshot");
        };
        assert!(message.contains("Toys"));
    }

    #[test]
    fn query_edit_updates_estimate_in_place() {
        let store = store();
        let mut state = DashboardState::new(UserQuery::default());
        state.refresh(&store, &settings());
        state.query.sold = "oops".to_string();
        state.query_changed();
        let Some(Ok(snapshot)) = state.snapshot() else {
            panic!("expected a snapshot");
        };
        assert!(snapshot.fit.is_ok());
        assert!(snapshot.estimate.is_err());
        assert!(!state.needs_refresh());
    }
}
