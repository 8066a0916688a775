//! Drives along the walls, firing at whatever the gun points at
use anyhow::Result;
use skirmish_client::{
    Bot, BotError, BotHandler, BotInfo, BotRunner, ClientConfig, Color, HitBotEvent,
    ScannedBotEvent,
};

struct Walls;

impl BotHandler for Walls {
    fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
        bot.set_body_color(Some(Color::BLACK));
        bot.set_turret_color(Some(Color::BLACK));
        bot.set_radar_color(Some(Color::ORANGE));
        bot.set_bullet_color(Some(Color::YELLOW));

        let max_move = bot
            .game_setup()
            .map_or(800.0, |setup| f64::from(setup.arena_width.max(setup.arena_height)));

        // Need a tick before the direction is known
        bot.go()?;
        bot.turn_right(bot.direction()? % 90.0)?;
        bot.forward(max_move)?;
        bot.turn_gun_right(90.0)?;
        bot.turn_right(90.0)?;

        loop {
            bot.forward(max_move)?;
            bot.turn_right(90.0)?;
        }
    }

    fn on_scanned_bot(&self, bot: &Bot<'_>, _event: &ScannedBotEvent) -> Result<(), BotError> {
        bot.fire(2.0)?;
        Ok(())
    }

    fn on_hit_bot(&self, bot: &Bot<'_>, event: &HitBotEvent) -> Result<(), BotError> {
        let bearing = bot.bearing_to(event.x, event.y)?;
        if bearing.abs() < 90.0 {
            bot.back(100.0)
        } else {
            bot.forward(100.0)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    println!("Connecting to {}...", config.server_url);

    let info = BotInfo::new("Walls", "1.0").with_author("Skirmish");
    BotRunner::new(config, info, Walls).run().await?;

    println!("Connection closed");
    Ok(())
}
