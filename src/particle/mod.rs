use rand::Rng;

use crate::{
    config, random,
    types::{ColorId, RenderCommand, Vec2},
};

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub speed: f32,
    pub direction: f32,
    pub radius: f32,
    pub color: ColorId,
    pub attractiveness: f32,
    /// Per-particle susceptibility. Carried for every particle but not read by
    /// either motion policy.
    #[allow(dead_code)]
    pub attractedness: f32,
}

/// What a neighbor contributes to an update: its position and pull strength
/// at the start of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub pos: Vec2,
    pub attractiveness: f32,
}

/// Global input read by every particle during a step.
#[derive(Clone, Copy, Debug)]
pub struct StepInput {
    pub extent: Vec2,
    pub focal: Vec2,
    pub bias: f32,
    pub population_weight: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    Alive(RenderCommand),
    Expired,
}

/// Terms of the social pull for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pull {
    pub vector: Vec2,
    pub denominator: f32,
    pub total_attractiveness: f32,
    /// Sum of negative attractiveness among neighbors. Not applied to motion.
    pub repulsiveness: f32,
}

impl Particle {
    /// Creates a particle near the centre of `extent` with randomized traits.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, extent: Vec2, temperature: f32) -> Self {
        let spread_x = extent.x / 8.0;
        let spread_y = extent.y / 4.0;
        let pos = Vec2::new(
            extent.x / 2.0 + random::uniform(rng, 0.0, spread_x)
                - random::uniform(rng, 0.0, spread_x),
            extent.y / 2.0 + random::uniform(rng, 0.0, spread_y)
                - random::uniform(rng, 0.0, spread_y),
        );
        let speed =
            (config::SPEED_BASE + random::uniform(rng, 0.0, config::SPEED_JITTER)) * temperature;
        Self {
            pos,
            speed,
            direction: random::uniform(rng, 0.0, config::DIRECTION_INIT_MAX),
            radius: random::uniform(rng, 0.0, 1.0) * config::RADIUS_MAX,
            color: random::pick_color(rng),
            attractiveness: random::uniform(
                rng,
                config::ATTRACTIVENESS_MIN,
                config::ATTRACTIVENESS_MAX,
            ),
            attractedness: random::uniform(
                rng,
                config::ATTRACTEDNESS_MIN,
                config::ATTRACTEDNESS_MAX,
            ),
        }
    }

    pub fn as_neighbor(&self) -> Neighbor {
        Neighbor {
            pos: self.pos,
            attractiveness: self.attractiveness,
        }
    }

    /// Neighborhood predicate. Both per-axis distances must be nonzero and
    /// below `threshold`, so a particle sharing either coordinate exactly is
    /// not a neighbor.
    pub fn is_neighbor(&self, other: Vec2, threshold: f32) -> bool {
        let dx = (other.x - self.pos.x).abs();
        let dy = (other.y - self.pos.y).abs();
        dx != 0.0 && dx < threshold && dy != 0.0 && dy < threshold
    }

    /// Fills `out` with every candidate within `threshold` of this particle.
    pub fn neighborhood<'a, I>(&self, candidates: I, threshold: f32, out: &mut Vec<Neighbor>)
    where
        I: IntoIterator<Item = &'a Neighbor>,
    {
        out.clear();
        out.extend(
            candidates
                .into_iter()
                .filter(|n| self.is_neighbor(n.pos, threshold))
                .copied(),
        );
    }

    /// Mean position of the neighborhood with this particle included.
    pub fn cohesion_target(&self, neighbors: &[Neighbor]) -> Vec2 {
        let sum = neighbors.iter().fold(self.pos, |acc, n| acc + n.pos);
        sum / (neighbors.len() + 1) as f32
    }

    pub fn social_pull(
        &self,
        neighbors: &[Neighbor],
        focal: Vec2,
        population_weight: f32,
    ) -> Pull {
        let mut total_attractiveness = 0.0;
        let mut repulsiveness = 0.0;
        let mut weighted = Vec2::ZERO;
        for n in neighbors {
            if n.attractiveness > 0.0 {
                total_attractiveness += n.attractiveness;
                weighted += n.pos * n.attractiveness;
            } else {
                repulsiveness += n.attractiveness;
            }
        }
        // population_weight >= 0 and total_attractiveness sums positives only.
        let denominator = 1.0 + population_weight + total_attractiveness;
        let mixture = (self.pos + focal * population_weight + weighted) / denominator;
        Pull {
            vector: mixture - self.pos,
            denominator,
            total_attractiveness,
            repulsiveness,
        }
    }

    pub fn step_simple<R: Rng + ?Sized>(
        &mut self,
        neighbors: &[Neighbor],
        input: &StepInput,
        rng: &mut R,
    ) -> StepOutcome {
        let target = self.cohesion_target(neighbors);
        self.pos += Vec2::from_angle(self.direction) * self.speed
            + (target - self.pos) * config::COHESION_RATE;
        self.direction += random::centered(rng, config::SIMPLE_TURN);
        self.outcome(input.extent)
    }

    pub fn step_social<R: Rng + ?Sized>(
        &mut self,
        neighbors: &[Neighbor],
        input: &StepInput,
        rng: &mut R,
    ) -> StepOutcome {
        let pull = self.social_pull(neighbors, input.focal, input.population_weight);
        self.pos +=
            Vec2::from_angle(self.direction) * self.speed + pull.vector * input.bias.max(0.0);
        let width = std::f32::consts::PI / config::DIRECTION_MODIFIER;
        self.direction += random::centered(rng, width / 2.0);
        self.outcome(input.extent)
    }

    pub fn is_inside(&self, extent: Vec2) -> bool {
        self.pos.x >= 0.0
            && self.pos.x < extent.x - self.radius
            && self.pos.y >= 0.0
            && self.pos.y < extent.y - self.radius
    }

    fn outcome(&self, extent: Vec2) -> StepOutcome {
        if self.is_inside(extent) {
            StepOutcome::Alive(RenderCommand::Circle {
                center: self.pos,
                radius: self.radius,
                color: self.color,
            })
        } else {
            StepOutcome::Expired
        }
    }
}
