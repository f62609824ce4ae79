//! Session world construction
//!
//! The level layout is fixed data: a full-width ground with two pits,
//! block rows, pipes, enemy and coin placements, and background
//! decorations. Built fresh on every session start and respawn.

use glam::Vec2;

use super::state::{
    Block, BlockKind, BlockReward, Deco, DecoKind, Enemy, FreeCoin, Pipe, Player, PowerupKind,
    Tile, TileKind, World,
};
use crate::consts::*;

/// Gaps in the ground, as half-open tile column ranges
const PITS: [(i32, i32); 2] = [(88, 94), (128, 134)];

/// Build the level and spawn the player
pub fn build_world() -> World {
    let mut world = World {
        tiles: Vec::new(),
        pipes: Vec::new(),
        blocks: Vec::new(),
        enemies: Vec::new(),
        coins: Vec::new(),
        decos: Vec::new(),
        player: Player::spawn(),
        powerups: Vec::new(),
        particles: Vec::new(),
        flag_reached: false,
    };

    // Ground: full width minus the pits, a top tile over a body tile
    let columns = (WORLD_WIDTH / TILE) as i32;
    for tx in 0..columns {
        let in_pit = PITS.iter().any(|&(s, e)| tx >= s && tx < e);
        if !in_pit {
            world.tiles.push(Tile {
                tx,
                ty: GROUND_ROW,
                kind: TileKind::Top,
            });
            world.tiles.push(Tile {
                tx,
                ty: GROUND_ROW + 1,
                kind: TileKind::Body,
            });
        }
    }

    // Blocks
    let reward = |tx, ty, reward| Block {
        tx,
        ty,
        kind: BlockKind::Reward(reward),
        hit: false,
        broken: false,
    };
    let brick = |tx, ty| Block {
        tx,
        ty,
        kind: BlockKind::Brick,
        hit: false,
        broken: false,
    };

    let coin = BlockReward::Coin;
    let mushroom = BlockReward::Powerup(PowerupKind::Mushroom);
    let star = BlockReward::Powerup(PowerupKind::Star);

    world.blocks.extend([
        brick(16, 9),
        brick(17, 9),
        brick(18, 9),
        reward(19, 9, coin),
        brick(20, 9),
        brick(21, 9),
        reward(22, 9, mushroom),
        reward(22, 5, coin),
        brick(27, 9),
        brick(28, 9),
        reward(29, 9, coin),
        brick(30, 9),
        brick(38, 6),
        reward(39, 6, coin),
        brick(40, 6),
        brick(41, 6),
        brick(50, 9),
        brick(51, 9),
        brick(52, 9),
        brick(55, 6),
        brick(56, 6),
        reward(57, 6, coin),
        brick(58, 6),
        brick(59, 6),
        brick(63, 9),
        reward(64, 9, coin),
        brick(65, 9),
        brick(66, 9),
        brick(75, 6),
        reward(76, 6, star),
        brick(77, 6),
        brick(84, 9),
        brick(85, 9),
        brick(98, 6),
        brick(99, 6),
        brick(100, 6),
        brick(101, 6),
        brick(102, 6),
        brick(110, 9),
        brick(111, 9),
        brick(112, 9),
    ]);

    // Pipes
    world.pipes.extend(
        [(12, 2), (35, 3), (55, 4), (73, 3), (98, 2), (116, 2)]
            .map(|(tx, height)| Pipe { tx, height }),
    );

    // Enemies start one tile above the ground, walking left
    for tx in [24, 36, 46, 60, 78, 86, 96, 110, 122, 138, 150, 160] {
        world.enemies.push(Enemy::at(Vec2::new(
            tx as f32 * TILE,
            (GROUND_ROW - 1) as f32 * TILE,
        )));
    }

    // Free coins float three tiles up
    for tx in [25, 26, 27, 40, 41, 64, 65, 66, 99, 100, 101] {
        world.coins.push(FreeCoin {
            pos: Vec2::new(tx as f32 * TILE + 9.0, (GROUND_ROW - 3) as f32 * TILE),
            size: Vec2::new(14.0, 14.0),
            got: false,
            phase: 0.0,
        });
    }

    // Background decorations
    for (wx, kind) in [
        (200.0, DecoKind::Cloud),
        (600.0, DecoKind::Hill),
        (900.0, DecoKind::Cloud),
        (1200.0, DecoKind::Cloud),
        (1500.0, DecoKind::Hill),
        (1900.0, DecoKind::Cloud),
        (2400.0, DecoKind::Hill),
        (2900.0, DecoKind::Cloud),
        (3300.0, DecoKind::Hill),
        (3800.0, DecoKind::Cloud),
        (4200.0, DecoKind::Hill),
        (4700.0, DecoKind::Cloud),
        (5100.0, DecoKind::Hill),
        (5600.0, DecoKind::Cloud),
        (6000.0, DecoKind::Hill),
    ] {
        world.decos.push(Deco { wx, kind });
    }

    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pits_have_no_ground() {
        let world = build_world();
        for &(s, e) in &PITS {
            for tx in s..e {
                assert!(
                    !world.tiles.iter().any(|t| t.tx == tx),
                    "tile found inside pit at column {tx}"
                );
            }
        }
        // Columns outside pits carry a top and a body tile
        assert_eq!(
            world.tiles.len() as i32,
            2 * ((WORLD_WIDTH / TILE) as i32 - PITS.iter().map(|&(s, e)| e - s).sum::<i32>())
        );
    }

    #[test]
    fn layout_counts() {
        let world = build_world();
        assert_eq!(world.pipes.len(), 6);
        assert_eq!(world.enemies.len(), 12);
        assert_eq!(world.coins.len(), 11);
        assert!(world.blocks.len() > 30);
        assert!(world.powerups.is_empty());
        assert!(!world.flag_reached);
    }

    #[test]
    fn exactly_one_star_and_one_mushroom_box() {
        let world = build_world();
        let count = |reward| {
            world
                .blocks
                .iter()
                .filter(|b| b.kind == BlockKind::Reward(reward))
                .count()
        };
        assert_eq!(count(BlockReward::Powerup(PowerupKind::Mushroom)), 1);
        assert_eq!(count(BlockReward::Powerup(PowerupKind::Star)), 1);
    }

    #[test]
    fn flag_sits_before_world_end() {
        let world = build_world();
        assert_eq!(world.flag_x(), WORLD_WIDTH - 5.0 * TILE);
    }
}
