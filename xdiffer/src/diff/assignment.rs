//! Minimum-cost assignment (Hungarian algorithm).

/// Solves the square assignment problem for `cost` and returns, for each
/// row, the column assigned to it. The total cost of the returned
/// assignment is minimal.
///
/// Runs in O(n³) using row and column potentials.
pub(crate) fn solve(cost: &[Vec<i64>]) -> Vec<usize> {
    let n = cost.len();
    if n == 0 {
        return Vec::new();
    }

    // 1-based internally; column 0 and row 0 are sentinels
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut row_of = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of[0] = row;
        let mut col0 = 0;
        let mut min_slack = vec![i64::MAX; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col0] = true;
            let row0 = row_of[col0];
            let mut delta = i64::MAX;
            let mut col1 = 0;

            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let slack = cost[row0 - 1][col - 1] - u[row0] - v[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }

            for col in 0..=n {
                if used[col] {
                    u[row_of[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            col0 = col1;
            if row_of[col0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let col1 = way[col0];
            row_of[col0] = row_of[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; n];
    for col in 1..=n {
        if row_of[col] != 0 {
            assignment[row_of[col] - 1] = col - 1;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(cost: &[Vec<i64>], assignment: &[usize]) -> i64 {
        assignment
            .iter()
            .enumerate()
            .map(|(row, &col)| cost[row][col])
            .sum()
    }

    #[test]
    fn test_empty() {
        assert!(solve(&[]).is_empty());
    }

    #[test]
    fn test_single() {
        assert_eq!(solve(&[vec![7]]), vec![0]);
    }

    #[test]
    fn test_classic_instance() {
        let cost = vec![vec![4, 1, 3], vec![2, 0, 5], vec![3, 2, 2]];
        let assignment = solve(&cost);
        assert_eq!(total(&cost, &assignment), 5);
    }

    #[test]
    fn test_anti_diagonal() {
        let cost = vec![
            vec![9, 9, 9, 1],
            vec![9, 9, 1, 9],
            vec![9, 1, 9, 9],
            vec![1, 9, 9, 9],
        ];
        assert_eq!(solve(&cost), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_is_a_permutation() {
        let cost = vec![
            vec![5, 5, 5, 5, 5],
            vec![5, 5, 5, 5, 5],
            vec![1, 2, 3, 4, 5],
            vec![5, 4, 3, 2, 1],
            vec![0, 0, 0, 0, 0],
        ];
        let mut assignment = solve(&cost);
        assert_eq!(total(&cost, &assignment), 5 + 5 + 1 + 1 + 0);
        assignment.sort_unstable();
        assert_eq!(assignment, vec![0, 1, 2, 3, 4]);
    }
}
