//! 2-opt route improvement.
//!
//! Reverses contiguous segments of a finished route, keeping a swap only
//! when the total distance strictly decreases, and repeats full passes
//! until none improves. The depot endpoints stay fixed, so the result is
//! still a round trip serving the same customers.

use crate::instance::VrpInstance;

/// Improve a single route up to its 2-opt local optimum
pub fn improve_route(instance: &VrpInstance, route: &[usize]) -> Vec<usize> {
    let mut route = route.to_vec();
    if route.len() < 4 {
        return route;
    }

    let mut distance = instance.route_distance(&route);
    let mut improved = true;

    while improved {
        improved = false;

        for i in 1..route.len() - 1 {
            for j in i + 1..route.len() - 1 {
                let mut candidate = route.clone();
                candidate[i..=j].reverse();
                let candidate_distance = instance.route_distance(&candidate);

                if candidate_distance < distance {
                    route = candidate;
                    distance = candidate_distance;
                    improved = true;
                }
            }
        }
    }

    route
}

/// Improve every route of a committed plan independently
pub fn improve_all(instance: &VrpInstance, routes: &mut [Vec<usize>]) {
    for route in routes.iter_mut() {
        *route = improve_route(instance, route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;

    /// Four customers on a line; the matrix makes out-of-order visits costly
    fn line_instance() -> VrpInstance {
        let nodes = vec![
            Node::new(1, "depot", "depot", 0),
            Node::new(2, "b", "b", 1),
            Node::new(3, "c", "c", 1),
            Node::new(4, "d", "d", 1),
            Node::new(5, "e", "e", 1),
        ];
        // Positions 0, 1, 2, 3, 4 on a line, distance = coordinate gap
        let matrix = vec![
            vec![0, 1, 2, 3, 4],
            vec![1, 0, 1, 2, 3],
            vec![2, 1, 0, 1, 2],
            vec![3, 2, 1, 0, 1],
            vec![4, 3, 2, 1, 0],
        ];
        VrpInstance::from_parts("line", nodes, matrix).unwrap()
    }

    #[test]
    fn test_removes_crossing() {
        let instance = line_instance();
        // Visiting 1, 3, 2, 4 doubles back twice
        let crossed = vec![0, 1, 3, 2, 4, 0];
        let improved = improve_route(&instance, &crossed);

        assert_eq!(improved, vec![0, 1, 2, 3, 4, 0]);
        assert!(instance.route_distance(&improved) < instance.route_distance(&crossed));
    }

    #[test]
    fn test_never_increases_distance() {
        let instance = line_instance();
        for route in [
            vec![0, 1, 2, 3, 4, 0],
            vec![0, 4, 3, 2, 1, 0],
            vec![0, 2, 4, 1, 3, 0],
            vec![0, 3, 1, 4, 2, 0],
        ] {
            let improved = improve_route(&instance, &route);
            assert!(instance.route_distance(&improved) <= instance.route_distance(&route));
        }
    }

    #[test]
    fn test_fixed_point_is_stable() {
        let instance = line_instance();
        let improved = improve_route(&instance, &[0, 2, 4, 1, 3, 0]);
        let again = improve_route(&instance, &improved);
        assert_eq!(improved, again);
    }

    #[test]
    fn test_depot_endpoints_untouched() {
        let instance = line_instance();
        let improved = improve_route(&instance, &[0, 3, 1, 4, 2, 0]);
        assert_eq!(*improved.first().unwrap(), 0);
        assert_eq!(*improved.last().unwrap(), 0);

        let mut sorted: Vec<usize> = improved[1..improved.len() - 1].to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_short_routes_pass_through() {
        let instance = line_instance();
        assert_eq!(improve_route(&instance, &[0, 0]), vec![0, 0]);
        assert_eq!(improve_route(&instance, &[0, 2, 0]), vec![0, 2, 0]);
    }

    #[test]
    fn test_improve_all_applies_per_route() {
        let instance = line_instance();
        let mut routes = vec![vec![0, 1, 3, 2, 4, 0], vec![0, 2, 0]];
        improve_all(&instance, &mut routes);

        assert_eq!(routes[0], vec![0, 1, 2, 3, 4, 0]);
        assert_eq!(routes[1], vec![0, 2, 0]);
    }
}
