mod command;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
