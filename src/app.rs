use eframe::egui::{self, TextureHandle, TextureOptions};

use crate::render::window_title;
use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QuicklookApp {
    pub state: ViewerState,
    texture: Option<TextureHandle>,
    shown_title: String,
}

impl QuicklookApp {
    pub fn new(state: ViewerState) -> Self {
        let shown_title = window_title(&state.options);
        Self {
            state,
            texture: None,
            shown_title,
        }
    }

    /// Upload a freshly built image, reusing the texture slot if there is one.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(image) = self.state.pending_image.take() else {
            return;
        };
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("grid", image, TextureOptions::NEAREST));
            }
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = window_title(&self.state.options);
        if title != self.shown_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.shown_title = title;
        }
    }
}

impl eframe::App for QuicklookApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_texture(ctx);
        self.sync_title(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: sample under the pointer ----
        egui::TopBottomPanel::bottom("readout").show(ctx, |ui| {
            panels::readout_bar(ui, &self.state);
        });

        // ---- Left side panel: display controls ----
        egui::SidePanel::left("display_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: image ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::grid_plot(ui, &mut self.state, self.texture.as_ref());
        });
    }
}
