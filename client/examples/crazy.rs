//! Zig-zags at random and turns around before reaching a wall
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use rand::Rng;
use skirmish_client::{
    Bot, BotError, BotHandler, BotInfo, BotRunner, ClientConfig, Color, Condition, CustomEvent,
    HitWallEvent, ScannedBotEvent,
};

const NEAR_WALL: &str = "near-wall";
const WALL_MARGIN: f64 = 60.0;

#[derive(Default)]
struct Crazy {
    moving_forward: AtomicBool,
}

impl Crazy {
    fn reverse(&self, bot: &Bot<'_>) -> Result<(), BotError> {
        if self.moving_forward.fetch_xor(true, Ordering::Relaxed) {
            bot.set_back(40_000.0)
        } else {
            bot.set_forward(40_000.0)
        }
    }
}

impl BotHandler for Crazy {
    fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
        bot.set_body_color(Some(Color::rgb(0, 200, 0)));
        bot.set_radar_color(Some(Color::WHITE));

        if let Some(setup) = bot.game_setup() {
            let (width, height) = (f64::from(setup.arena_width), f64::from(setup.arena_height));
            bot.add_custom_event(Condition::new(NEAR_WALL, move |tick| {
                let state = &tick.bot_state;
                state.x < WALL_MARGIN
                    || state.y < WALL_MARGIN
                    || state.x > width - WALL_MARGIN
                    || state.y > height - WALL_MARGIN
            }));
        }

        let mut rng = rand::thread_rng();
        loop {
            bot.set_forward(40_000.0)?;
            self.moving_forward.store(true, Ordering::Relaxed);

            bot.turn_right(rng.gen_range(45.0..135.0))?;
            bot.turn_left(rng.gen_range(90.0..180.0))?;
            bot.turn_right(rng.gen_range(90.0..180.0))?;
        }
    }

    fn on_custom_event(&self, bot: &Bot<'_>, event: &CustomEvent) -> Result<(), BotError> {
        if event.condition == NEAR_WALL {
            self.reverse(bot)?;
        }
        Ok(())
    }

    fn on_hit_wall(&self, bot: &Bot<'_>, _event: &HitWallEvent) -> Result<(), BotError> {
        self.reverse(bot)
    }

    fn on_scanned_bot(&self, bot: &Bot<'_>, _event: &ScannedBotEvent) -> Result<(), BotError> {
        bot.fire(1.0)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let info = BotInfo::new("Crazy", "1.0").with_author("Skirmish");
    BotRunner::new(ClientConfig::from_env(), info, Crazy::default())
        .run()
        .await
}
