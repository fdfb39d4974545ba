mod command;
mod play;
mod tui;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
