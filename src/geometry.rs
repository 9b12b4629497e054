use rand::Rng;

use super::error::GenerationError;

/// A 1-based position inside one zone's grid.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    pub fn new(x: usize, y: usize) -> GridCoord {
        GridCoord{x, y}
    }

    /// Grid neighbours to the right and above, the ones that get edges from this node.
    pub fn forward_neighbours(&self, grid_width: usize) -> Vec<GridCoord> {
        let mut others = vec![];
        if self.x < grid_width {
            others.push(GridCoord::new(self.x + 1, self.y));
        }
        if self.y < grid_width {
            others.push(GridCoord::new(self.x, self.y + 1));
        }
        others
    }
}

/// Maps (coordinate, zone) pairs to location ids and back.
///
/// Zone 0 is the main grid, zones 1..=num_suburbs are the suburbs.  Location ids run from 1 to
/// `num_nodes()`, main grid first, then each suburb in turn, row by row.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CityLayout {
    width: usize,
    num_suburbs: usize,
    sub_width: usize,
}

impl CityLayout {
    pub fn new(width: usize, num_suburbs: usize) -> Result<CityLayout, GenerationError> {
        if width < 1 {
            return Err(GenerationError::InvalidParameter(
                String::from("city width must be at least 1")));
        }
        let sub_width = width / 2;
        if num_suburbs > 0 && sub_width == 0 {
            return Err(GenerationError::InvalidParameter(format!(
                "a city of width {} is too small to have suburbs", width)));
        }
        Ok(CityLayout {width, num_suburbs, sub_width})
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_suburbs(&self) -> usize {
        self.num_suburbs
    }

    pub fn sub_width(&self) -> usize {
        self.sub_width
    }

    pub fn num_nodes(&self) -> usize {
        self.width.pow(2) + self.num_suburbs * self.sub_width.pow(2)
    }

    pub fn num_zones(&self) -> usize {
        self.num_suburbs + 1
    }

    pub fn zone_width(&self, zone: usize) -> usize {
        if zone == 0 {
            self.width
        } else {
            self.sub_width
        }
    }

    pub fn zone_size(&self, zone: usize) -> usize {
        self.zone_width(zone).pow(2)
    }

    fn zone_offset(&self, zone: usize) -> usize {
        if zone == 0 {
            0
        } else {
            self.width.pow(2) + (zone - 1) * self.sub_width.pow(2)
        }
    }

    pub fn contains_coord(&self, coord: &GridCoord, zone: usize) -> bool {
        let zw = self.zone_width(zone);
        zone <= self.num_suburbs && 1 <= coord.x && coord.x <= zw && 1 <= coord.y && coord.y <= zw
    }

    /// The location id of `coord` in `zone`.  The coordinate must lie inside the zone.
    pub fn to_loc(&self, coord: &GridCoord, zone: usize) -> usize {
        debug_assert!(self.contains_coord(coord, zone), "{:?} is outside zone {}", coord, zone);
        let zw = self.zone_width(zone);
        self.zone_offset(zone) + (coord.y - 1) * zw + coord.x
    }

    /// Inverse of `to_loc`; None for ids outside 1..=num_nodes.
    pub fn from_loc(&self, loc: usize) -> Option<(GridCoord, usize)> {
        if loc < 1 || loc > self.num_nodes() {
            return None;
        }
        let main_size = self.width.pow(2);
        let (zone, local) = if loc <= main_size {
            (0, loc - 1)
        } else {
            let sub_size = self.sub_width.pow(2);
            let rest = loc - main_size - 1;
            (rest / sub_size + 1, rest % sub_size)
        };
        let zw = self.zone_width(zone);
        Some((GridCoord::new(local % zw + 1, local / zw + 1), zone))
    }

    pub fn zone_of(&self, loc: usize) -> Option<usize> {
        self.from_loc(loc).map(|(_, zone)| zone)
    }

    /// Every location id in the zone, in id order.
    pub fn zone_locs(&self, zone: usize) -> std::ops::RangeInclusive<usize> {
        let offset = self.zone_offset(zone);
        (offset + 1)..=(offset + self.zone_size(zone))
    }

    pub fn random_loc_in_zone<RR: Rng>(&self, zone: usize, rng: &mut RR) -> usize {
        let zw = self.zone_width(zone);
        let coord = GridCoord::new(rng.gen_range(1..=zw), rng.gen_range(1..=zw));
        self.to_loc(&coord, zone)
    }

    pub fn random_suburb<RR: Rng>(&self, rng: &mut RR) -> Option<usize> {
        if self.num_suburbs == 0 {
            None
        } else {
            Some(rng.gen_range(1..=self.num_suburbs))
        }
    }

    /// A uniformly random point on the main grid's boundary: pick a side, then an offset on it.
    pub fn random_perimeter_coord<RR: Rng>(&self, rng: &mut RR) -> GridCoord {
        let offset = rng.gen_range(1..=self.width);
        match rng.gen_range(0..4) {
            0 => GridCoord::new(1, offset),
            1 => GridCoord::new(self.width, offset),
            2 => GridCoord::new(offset, 1),
            _ => GridCoord::new(offset, self.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    #[test]
    fn test_loc_bijection() {
        let layout = CityLayout::new(5, 3).unwrap();
        assert_eq!(layout.sub_width(), 2);
        assert_eq!(layout.num_nodes(), 25 + 3 * 4);

        let mut seen = vec![false; layout.num_nodes() + 1];
        for zone in 0..layout.num_zones() {
            let zw = layout.zone_width(zone);
            for (yy, xx) in iproduct!(1..=zw, 1..=zw) {
                let coord = GridCoord::new(xx, yy);
                let loc = layout.to_loc(&coord, zone);
                assert!(1 <= loc && loc <= layout.num_nodes());
                assert!(!seen[loc], "location {} produced twice", loc);
                seen[loc] = true;
                assert_eq!(layout.from_loc(loc), Some((coord, zone)));
                assert!(layout.zone_locs(zone).contains(&loc));
            }
        }
        assert!(seen[1..].iter().all(|ss| *ss));
    }

    #[test]
    fn test_known_locs() {
        let layout = CityLayout::new(4, 2).unwrap();
        assert_eq!(layout.to_loc(&GridCoord::new(1, 1), 0), 1);
        assert_eq!(layout.to_loc(&GridCoord::new(4, 4), 0), 16);
        assert_eq!(layout.to_loc(&GridCoord::new(1, 1), 1), 17);
        assert_eq!(layout.to_loc(&GridCoord::new(2, 2), 1), 20);
        assert_eq!(layout.to_loc(&GridCoord::new(1, 1), 2), 21);
        assert_eq!(layout.from_loc(0), None);
        assert_eq!(layout.from_loc(25), None);
        assert_eq!(layout.zone_of(18), Some(1));
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(CityLayout::new(0, 0).is_err());
        // width 1 has no room for a suburb of positive width
        assert!(CityLayout::new(1, 1).is_err());
        let layout = CityLayout::new(1, 0).unwrap();
        assert_eq!(layout.num_nodes(), 1);
    }

    #[test]
    fn test_random_coords_in_range() {
        let layout = CityLayout::new(6, 2).unwrap();
        let mut rng = Isaac64Rng::seed_from_u64(3);
        for _ in 0..500 {
            let pc = layout.random_perimeter_coord(&mut rng);
            assert!(pc.x == 1 || pc.y == 1 || pc.x == 6 || pc.y == 6);
            assert!(layout.contains_coord(&pc, 0));

            let zone = layout.random_suburb(&mut rng).unwrap();
            assert!(1 <= zone && zone <= 2);
            let loc = layout.random_loc_in_zone(zone, &mut rng);
            assert_eq!(layout.zone_of(loc), Some(zone));
        }
        let no_subs = CityLayout::new(6, 0).unwrap();
        assert_eq!(no_subs.random_suburb(&mut rng), None);
    }
}
