/// Edge of the single coarsest block: the smallest power of two covering the
/// longer image edge.
#[must_use]
pub fn initial_block_size(width: u32, height: u32) -> u32 {
    width
        .max(height)
        .max(1)
        .checked_next_power_of_two()
        .unwrap_or(1 << 31)
}

/// Block edge of every refinement level, coarsest first, ending at 1.
#[must_use]
pub fn block_schedule(width: u32, height: u32) -> Vec<u32> {
    let mut block = initial_block_size(width, height);
    let mut schedule = vec![block];

    while block > 1 {
        block /= 2;
        schedule.push(block);
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_block_covers_longer_edge() {
        assert_eq!(initial_block_size(256, 256), 256);
        assert_eq!(initial_block_size(300, 200), 512);
        assert_eq!(initial_block_size(200, 257), 512);
        assert_eq!(initial_block_size(1, 1), 1);
        assert_eq!(initial_block_size(3, 1), 4);
    }

    #[test]
    fn test_schedule_halves_down_to_one() {
        assert_eq!(block_schedule(5, 3), vec![8, 4, 2, 1]);
        assert_eq!(block_schedule(1, 1), vec![1]);
    }

    #[test]
    fn test_schedule_is_strictly_decreasing_powers_of_two() {
        for (width, height) in [(1, 7), (13, 2), (64, 64), (65, 64), (640, 480), (1920, 1080)] {
            let schedule = block_schedule(width, height);

            assert_eq!(schedule.last(), Some(&1));
            assert!(schedule.iter().all(|b| b.is_power_of_two()));
            assert!(schedule.windows(2).all(|pair| pair[0] == pair[1] * 2));
            assert!(schedule[0] >= width.max(height));
        }
    }
}
