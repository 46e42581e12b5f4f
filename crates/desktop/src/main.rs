mod app;
mod camera;
mod panels;
mod roster;
mod settings;
mod stats;
mod theme;
mod widgets;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .title("FaceDeck")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(1080.0, 720.0),
            ..Default::default()
        })
        .run()
}
